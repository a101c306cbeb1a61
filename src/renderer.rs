//! Template rendering engine for nimata.
//! Walks the parsed block tree, evaluates conditions and loops against a
//! JSON context, and substitutes `{{…}}` tokens in the literal runs.

use crate::context;
use crate::error::{Error, Result};
use crate::expr;
use crate::helpers;
use crate::parser::{parse, Node};
use crate::validator::{self, Severity};
use log::debug;
use regex::{Captures, Regex};
use serde_json::Value;

/// Matches one well-formed substitution token. The inner group excludes
/// braces so the pattern cannot backtrack across nested `{{`.
const TOKEN_PATTERN: &str = r"\{\{([^{}]+)\}\}";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// The built-in rendering engine.
///
/// Rendering is lenient by default: unresolved variables become empty
/// strings, unknown helpers produce empty output, and malformed block
/// structure passes through as literal text. [`Engine::with_validation`]
/// adds a strict pre-check that refuses to render templates with blocking
/// validation findings.
pub struct Engine {
    token_re: Regex,
    validate_first: bool,
}

impl Engine {
    /// Creates a lenient engine.
    pub fn new() -> Self {
        Self {
            token_re: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
            validate_first: false,
        }
    }

    /// Creates an engine that validates each template before rendering and
    /// fails on findings of severity ERROR or above.
    pub fn with_validation() -> Self {
        Self { validate_first: true, ..Self::new() }
    }

    fn render_nodes(&self, nodes: &[Node], context: &Value) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(&self.substitute(text, context)),
                Node::If { condition, then_branch, else_branch } => {
                    let branch = if expr::evaluate(condition, context) {
                        then_branch
                    } else {
                        else_branch
                    };
                    out.push_str(&self.render_nodes(branch, context));
                }
                Node::Each { path, body } => {
                    out.push_str(&self.render_each(path, body, context));
                }
            }
        }
        out
    }

    /// Renders a loop body once per item of the collection at `path`.
    ///
    /// Arrays iterate in element order and objects in insertion order, each
    /// iteration under its own scope from [`context::item_context`]. A
    /// missing or scalar collection renders nothing.
    fn render_each(&self, path: &str, body: &[Node], context: &Value) -> String {
        let mut out = String::new();
        match context::resolve(context, path) {
            Some(Value::Array(items)) => {
                let len = items.len();
                for (index, item) in items.iter().enumerate() {
                    let scope = context::item_context(context, item, index, len, "");
                    out.push_str(&self.render_nodes(body, &scope));
                }
            }
            Some(Value::Object(entries)) => {
                let len = entries.len();
                for (index, (key, item)) in entries.iter().enumerate() {
                    let scope = context::item_context(context, item, index, len, key);
                    out.push_str(&self.render_nodes(body, &scope));
                }
            }
            other => {
                debug!("Each target '{}' is not iterable: {:?}", path, other);
            }
        }
        out
    }

    /// Replaces every `{{…}}` token in a literal run.
    ///
    /// `helper:<name> <path>` tokens stringify the path's value and feed it
    /// through the named helper; all other tokens are plain path lookups.
    /// Both fail soft to the empty string.
    fn substitute(&self, text: &str, context: &Value) -> String {
        self.token_re
            .replace_all(text, |caps: &Captures| {
                let inner = caps[1].trim();
                if let Some(invocation) = inner.strip_prefix("helper:") {
                    let (name, arg) = match invocation.split_once(' ') {
                        Some((name, arg)) => (name.trim(), arg.trim()),
                        None => (invocation.trim(), ""),
                    };
                    let input = context::stringify(context::resolve(context, arg));
                    helpers::apply_named(name, &input)
                } else {
                    context::stringify(context::resolve(context, inner))
                }
            })
            .into_owned()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl TemplateRenderer for Engine {
    /// Renders a template string against a JSON context.
    ///
    /// # Errors
    /// * `Error::ValidationError` if this engine validates first and the
    ///   template has findings of severity ERROR or CRITICAL
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        if self.validate_first {
            let findings = validator::validate_template(template, None);
            let blocking: Vec<String> = findings
                .iter()
                .filter(|finding| finding.severity >= Severity::Error)
                .map(|finding| format!("{}: {}", finding.code, finding.message))
                .collect();
            if !blocking.is_empty() {
                return Err(Error::ValidationError(blocking.join("; ")));
            }
        }
        Ok(self.render_nodes(&parse(template), context))
    }
}

//! Static template validation.
//!
//! Rules inspect template text (and optionally its definition metadata)
//! without rendering anything. Each finding carries a stable code plus a
//! severity and category, so callers can decide what blocks a render and
//! what is only advisory. [`validate_template`] never fails: a template
//! with no problems simply yields an empty list.

use crate::constants::{MAX_EACH_BLOCKS, MAX_TEMPLATE_SIZE};
use crate::loader::{TemplateMetadata, VariableType};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// How serious a finding is. `Error` and above block strict rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// The aspect of the template a finding concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Syntax,
    Structure,
    Content,
    Dependency,
    Performance,
    Security,
    Compatibility,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Syntax => "SYNTAX",
            Category::Structure => "STRUCTURE",
            Category::Content => "CONTENT",
            Category::Dependency => "DEPENDENCY",
            Category::Performance => "PERFORMANCE",
            Category::Security => "SECURITY",
            Category::Compatibility => "COMPATIBILITY",
        };
        write!(f, "{}", name)
    }
}

/// Location details for findings that point at a specific line.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// One-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub snippet: String,
}

/// One validation finding.
#[derive(Debug, Clone)]
pub struct TemplateError {
    /// Stable machine-readable code, e.g. `UNBALANCED_BRACES`
    pub code: &'static str,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub context: Option<ErrorContext>,
    pub suggestion: Option<String>,
    /// Concrete remediation steps, possibly empty
    pub fixes: Vec<String>,
}

impl TemplateError {
    fn new(
        code: &'static str,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            severity,
            category,
            context: None,
            suggestion: None,
            fixes: Vec::new(),
        }
    }

    fn at_line(mut self, line: usize, snippet: &str) -> Self {
        self.context = Some(ErrorContext { line, snippet: trim_snippet(snippet) });
        self
    }

    fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }
}

fn trim_snippet(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.len() > 80 {
        let cut: String = trimmed.chars().take(77).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

/// Runs every rule against the template content.
///
/// Pass the definition metadata as well to include the structural and
/// dependency rules; content-only callers (single file templates) pass
/// `None`.
pub fn validate_template(
    content: &str,
    metadata: Option<&TemplateMetadata>,
) -> Vec<TemplateError> {
    let mut errors = Vec::new();
    check_content(content, &mut errors);
    check_syntax(content, &mut errors);
    check_performance(content, &mut errors);
    check_security(content, &mut errors);
    check_compatibility(content, &mut errors);
    if let Some(metadata) = metadata {
        errors.extend(validate_metadata(metadata));
    }
    errors
}

/// Runs the structural and dependency rules against a parsed definition.
pub fn validate_metadata(metadata: &TemplateMetadata) -> Vec<TemplateError> {
    let mut errors = Vec::new();
    check_structure(metadata, &mut errors);
    check_dependencies(metadata, &mut errors);
    errors
}

fn check_content(content: &str, errors: &mut Vec<TemplateError>) {
    if content.trim().is_empty() {
        errors.push(
            TemplateError::new(
                "EMPTY_TEMPLATE",
                Severity::Critical,
                Category::Content,
                "Template content is empty",
            )
            .suggest("Add template content before registering it"),
        );
        return;
    }

    for (index, line) in content.lines().enumerate() {
        if line.contains("TODO") || line.contains("FIXME") {
            errors.push(
                TemplateError::new(
                    "TODO_MARKERS",
                    Severity::Warning,
                    Category::Content,
                    "Template contains unfinished TODO or FIXME markers",
                )
                .at_line(index + 1, line)
                .suggest("Resolve the marker or remove it from the template"),
            );
            break;
        }
    }
}

fn check_syntax(content: &str, errors: &mut Vec<TemplateError>) {
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') && !trimmed.starts_with("{{") {
        if let Err(parse_err) = serde_json::from_str::<Value>(content) {
            errors.push(
                TemplateError::new(
                    "INVALID_JSON",
                    Severity::Error,
                    Category::Syntax,
                    format!("Template looks like JSON but does not parse: {}", parse_err),
                )
                .suggest("Fix the JSON structure or quote embedded template tokens"),
            );
        }
    }

    let opens = content.matches("{{").count();
    let closes = content.matches("}}").count();
    if opens != closes {
        errors.push(
            TemplateError::new(
                "UNBALANCED_BRACES",
                Severity::Error,
                Category::Syntax,
                format!("Found {} opening '{{{{' and {} closing '}}}}'", opens, closes),
            )
            .suggest("Every '{{' needs a matching '}}' on the same token")
            .fix("Add the missing braces or remove the stray ones"),
        );
    }

    for (index, line) in content.lines().enumerate() {
        if (line.contains("{{#") || line.contains("{{/")) && !line.contains("}}") {
            errors.push(
                TemplateError::new(
                    "INCOMPLETE_HELPER",
                    Severity::Error,
                    Category::Syntax,
                    "Block tag is not closed on its line",
                )
                .at_line(index + 1, line)
                .suggest("Close the tag with '}}' before the line ends"),
            );
        }
    }
}

fn check_performance(content: &str, errors: &mut Vec<TemplateError>) {
    if content.len() > MAX_TEMPLATE_SIZE {
        errors.push(
            TemplateError::new(
                "TEMPLATE_TOO_LARGE",
                Severity::Warning,
                Category::Performance,
                format!(
                    "Template is {} bytes, which exceeds the {} byte guideline",
                    content.len(),
                    MAX_TEMPLATE_SIZE
                ),
            )
            .suggest("Split the template into smaller composable templates"),
        );
    }

    let each_blocks = content.matches("{{#each").count();
    if each_blocks > MAX_EACH_BLOCKS {
        errors.push(
            TemplateError::new(
                "EXCESSIVE_NESTING",
                Severity::Warning,
                Category::Performance,
                format!(
                    "Template contains {} '{{{{#each' blocks (guideline is {})",
                    each_blocks, MAX_EACH_BLOCKS
                ),
            )
            .suggest("Flatten the data or move repeated sections into their own templates"),
        );
    }
}

struct DangerousPattern {
    regex: Regex,
    token: &'static str,
    risk: &'static str,
}

fn dangerous_patterns() -> &'static [DangerousPattern] {
    static PATTERNS: OnceLock<Vec<DangerousPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"\beval\s*\(", "eval(", "arbitrary code execution"),
            (r"\bFunction\s*\(", "Function(", "arbitrary code execution"),
            (r"document\.write", "document.write", "cross-site scripting"),
            (r"innerHTML\s*=", "innerHTML =", "cross-site scripting"),
        ]
        .into_iter()
        .map(|(pattern, token, risk)| DangerousPattern {
            regex: Regex::new(pattern).expect("dangerous pattern is valid"),
            token,
            risk,
        })
        .collect()
    })
}

/// One warning per matched pattern, not per occurrence.
fn check_security(content: &str, errors: &mut Vec<TemplateError>) {
    for pattern in dangerous_patterns() {
        if pattern.regex.is_match(content) {
            errors.push(
                TemplateError::new(
                    "DANGEROUS_PATTERN",
                    Severity::Warning,
                    Category::Security,
                    format!("Template contains '{}', a {} risk", pattern.token, pattern.risk),
                )
                .suggest("Generated code should not embed dynamic execution primitives"),
            );
        }
    }
}

fn check_compatibility(content: &str, errors: &mut Vec<TemplateError>) {
    if content.contains("{{each ") {
        errors.push(
            TemplateError::new(
                "DEPRECATED_SYNTAX",
                Severity::Warning,
                Category::Compatibility,
                "'{{each' is outdated loop syntax",
            )
            .suggest("Write the block as '{{#each items}}...{{/each}}'")
            .fix("Replace '{{each' with '{{#each' and close the block with '{{/each}}'"),
        );
    }
}

fn check_structure(metadata: &TemplateMetadata, errors: &mut Vec<TemplateError>) {
    if metadata.name.trim().is_empty() {
        errors.push(
            TemplateError::new(
                "MISSING_TEMPLATE_NAME",
                Severity::Error,
                Category::Structure,
                "Template definition has no name",
            )
            .suggest("Set a non-empty 'name' field"),
        );
    }

    if metadata.supported_project_types.is_empty() {
        errors.push(
            TemplateError::new(
                "NO_PROJECT_TYPES",
                Severity::Error,
                Category::Structure,
                "Template definition declares no supported project types",
            )
            .suggest("List at least one entry under 'supportedProjectTypes'"),
        );
    }

    for (name, variable) in &metadata.variables {
        let Some(default) = &variable.default else {
            continue;
        };
        if !default_matches(variable.value_type, default) {
            errors.push(
                TemplateError::new(
                    "MISMATCHED_DEFAULT",
                    Severity::Warning,
                    Category::Structure,
                    format!(
                        "Default for variable '{}' is not a {} value",
                        name, variable.value_type
                    ),
                )
                .suggest("Align the default with the variable's declared type"),
            );
        }
    }
}

fn default_matches(value_type: VariableType, default: &Value) -> bool {
    match value_type {
        VariableType::String => default.is_string(),
        VariableType::Boolean => default.is_boolean(),
        VariableType::Number => default.is_number(),
    }
}

fn check_dependencies(metadata: &TemplateMetadata, errors: &mut Vec<TemplateError>) {
    if metadata.dependencies.iter().any(|dep| dep == &metadata.name) {
        errors.push(
            TemplateError::new(
                "CIRCULAR_DEPENDENCY",
                Severity::Critical,
                Category::Dependency,
                format!("Template '{}' depends on itself", metadata.name),
            )
            .suggest("Remove the self-reference from 'dependencies'"),
        );
    }
}

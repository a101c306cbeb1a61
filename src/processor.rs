//! Project template processing.
//! Builds the render context from declared variables and caller answers,
//! then renders a definition's file list into concrete paths and contents.

use log::debug;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::{
    error::{Error, Result},
    expr,
    loader::TemplateMetadata,
    renderer::TemplateRenderer,
};

/// One generated file, ready to be written by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Merges caller answers with declared variables into a render context.
///
/// Every declared variable resolves in order: the caller's answer wins,
/// then the declared default. Answers for undeclared names are passed
/// through unchanged, so ad hoc context values keep working.
///
/// # Errors
/// * `Error::MissingVariableError` if a required variable has neither an
///   answer nor a default
pub fn build_context(metadata: &TemplateMetadata, answers: &Value) -> Result<Value> {
    let mut merged = Map::new();

    for (name, variable) in &metadata.variables {
        if let Some(value) = answers.get(name) {
            merged.insert(name.clone(), value.clone());
        } else if let Some(default) = &variable.default {
            merged.insert(name.clone(), default.clone());
        } else if variable.required {
            return Err(Error::MissingVariableError { name: name.clone() });
        }
    }

    if let Value::Object(extra) = answers {
        for (key, value) in extra {
            merged.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    Ok(Value::Object(merged))
}

/// Renders every file of a template definition.
///
/// Files whose condition evaluates false are skipped, as are files whose
/// rendered path comes out empty. All other files render both their path
/// and their content with the same engine and context. The first hard
/// render failure aborts the whole batch.
pub fn process_project_template(
    engine: &dyn TemplateRenderer,
    metadata: &TemplateMetadata,
    context: &Value,
) -> Result<Vec<RenderedFile>> {
    debug!("Processing template '{}' with {} file(s).", metadata.name, metadata.files.len());
    let mut rendered = Vec::with_capacity(metadata.files.len());

    for file in &metadata.files {
        if let Some(condition) = &file.condition {
            if !expr::evaluate(condition, context) {
                debug!("Skipping '{}': condition '{}' is false.", file.path, condition);
                continue;
            }
        }

        let path = engine.render(&file.path, context)?;
        if path.trim().is_empty() {
            debug!("Skipping '{}': rendered path is empty.", file.path);
            continue;
        }

        let content = engine.render(&file.content, context)?;
        rendered.push(RenderedFile { path: PathBuf::from(path), content });
    }

    Ok(rendered)
}

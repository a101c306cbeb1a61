//! nimata's main application entry point and orchestration logic.
//! Handles command-line argument parsing and wires the template engine,
//! validator and store together for each subcommand.

use std::fs;
use std::path::{Path, PathBuf};

use nimata::{
    cli::{get_args, Args, Command},
    error::{default_error_handler, Error, Result},
    loader::TemplateStore,
    logger::init_logger,
    processor::{build_context, process_project_template},
    renderer::{Engine, TemplateRenderer},
    validator::{validate_template, Severity},
};
use serde_json::Value;

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and
///   `force` is false
fn get_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    let base_path = std::env::current_dir().unwrap_or_default();
    let abs_path = if dest_path.is_absolute() {
        dest_path.to_path_buf()
    } else {
        base_path.join(dest_path)
    };

    if let Some(parent) = abs_path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::write(abs_path, content).map_err(Error::IoError)
}

/// Reads the JSON context file, or produces an empty context when the
/// caller did not pass one.
fn read_context(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                Error::ContextError(format!(
                    "'{}' is not valid JSON: {}",
                    path.display(),
                    e
                ))
            })
        }
        None => Ok(Value::Object(serde_json::Map::new())),
    }
}

/// Main application logic execution.
fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Render { template, context, check } => {
            let content = fs::read_to_string(&template)?;
            let context = read_context(context.as_deref())?;
            let engine = if check { Engine::with_validation() } else { Engine::new() };
            print!("{}", engine.render(&content, &context)?);
            Ok(())
        }

        Command::Validate { template } => {
            let content = fs::read_to_string(&template)?;
            let findings = validate_template(&content, None);
            if findings.is_empty() {
                println!("No problems found in '{}'.", template.display());
                return Ok(());
            }

            for finding in &findings {
                println!(
                    "[{}/{}] {}: {}",
                    finding.severity, finding.category, finding.code, finding.message
                );
                if let Some(context) = &finding.context {
                    println!("    line {}: {}", context.line, context.snippet);
                }
                if let Some(suggestion) = &finding.suggestion {
                    println!("    suggestion: {}", suggestion);
                }
            }

            let blocking =
                findings.iter().filter(|f| f.severity >= Severity::Error).count();
            if blocking > 0 {
                return Err(Error::ValidationError(format!(
                    "{} blocking problem(s) in '{}'",
                    blocking,
                    template.display()
                )));
            }
            Ok(())
        }

        Command::List { templates_dir } => {
            let store = TemplateStore::open(&templates_dir);
            for name in store.available() {
                println!("{}", name);
            }
            Ok(())
        }

        Command::Generate { name, templates_dir, output_dir, context, force } => {
            let store = TemplateStore::open(&templates_dir);
            let metadata = store.load(&name)?;
            let answers = read_context(context.as_deref())?;
            let context = build_context(&metadata, &answers)?;

            let output_root = get_output_dir(&output_dir, force)?;
            let engine = Engine::with_validation();
            let files = process_project_template(&engine, &metadata, &context)?;

            for file in &files {
                let target = output_root.join(&file.path);
                write_file(&file.content, &target)?;
                println!("Created: '{}'", target.display());
            }

            println!(
                "Generated {} file(s) from template '{}' in {}.",
                files.len(),
                name,
                output_root.display()
            );
            Ok(())
        }
    }
}

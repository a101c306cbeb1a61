//! Error handling for the nimata application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for nimata operations.
///
/// Rendering itself degrades softly (unresolved values become empty strings,
/// malformed tags pass through), so these variants cover the hard failures:
/// filesystem access, definition parsing, and explicit validation.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during template processing
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Represents errors in the caller-supplied context values
    #[error("Context error: {0}.")]
    ContextError(String),

    /// The requested template definition is not present in the store
    #[error("Template '{name}' does not exist in the store.")]
    TemplateDoesNotExistError { name: String },

    /// A template definition file exists but could not be parsed
    #[error("Template definition '{name}' could not be parsed: {detail}.")]
    DefinitionParseError { name: String, detail: String },

    /// A template definition parsed but failed structural validation
    #[error("Template definition '{name}' is invalid: {detail}.")]
    InvalidMetadataError { name: String, detail: String },

    /// A declared variable is required but has neither answer nor default
    #[error("Variable '{name}' is required but no value or default was provided.")]
    MissingVariableError { name: String },

    /// Represents validation failures reported by the template validator
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// The output directory already exists and overwrite was not forced
    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },
}

/// Convenience type alias for Results with nimata's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}

use std::io;

use nimata::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::TemplateError("rendering failed".to_string());
    assert_eq!(err.to_string(), "Template error: rendering failed.");

    let err = Error::ValidationError("UNBALANCED_BRACES: 3 opening vs 2 closing".to_string());
    assert_eq!(err.to_string(), "Validation error: UNBALANCED_BRACES: 3 opening vs 2 closing.");

    let err = Error::TemplateDoesNotExistError { name: "web-api".to_string() };
    assert_eq!(err.to_string(), "Template 'web-api' does not exist in the store.");

    let err = Error::MissingVariableError { name: "project_name".to_string() };
    assert_eq!(
        err.to_string(),
        "Variable 'project_name' is required but no value or default was provided."
    );

    let err = Error::OutputDirectoryExistsError { output_dir: "out".to_string() };
    assert_eq!(
        err.to_string(),
        "Output directory 'out' already exists. Use --force to overwrite it."
    );
}

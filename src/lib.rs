//! nimata is the template processing core of a project scaffolding tool.
//! It renders Handlebars-style templates against JSON contexts, statically
//! validates template text before it ships, and loads named template
//! definitions from a file-backed store.

/// Command-line interface module for the nimata binary
pub mod cli;

/// Shared constants: definition extensions and validation thresholds
pub mod constants;

/// Context path resolution, truthiness and value stringification
pub mod context;

/// Error types and handling for the nimata application
pub mod error;

/// Condition expression evaluation for blocks and file conditions
pub mod expr;

/// Built-in helper transforms (case conversion and friends)
pub mod helpers;

/// Template definition loading and the caching template store
pub mod loader;

/// Logging setup for the binary
pub mod logger;

/// Template scanning and block tree parsing
pub mod parser;

/// Project template processing
/// Builds render contexts and materializes a definition's file list
pub mod processor;

/// The rendering engine: block tree walking and token substitution
pub mod renderer;

/// Static template validation rules and findings
pub mod validator;

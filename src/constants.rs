//! Common constants used throughout the nimata application.

/// Supported template definition file extensions, in lookup order
pub const DEFINITION_EXTENSIONS: [&str; 3] = ["json", "yml", "yaml"];

/// Template size above which the validator reports a performance warning
pub const MAX_TEMPLATE_SIZE: usize = 100 * 1024;

/// Number of `{{#each` blocks above which the validator reports a warning
pub const MAX_EACH_BLOCKS: usize = 10;

//! Logging setup for the nimata binary.

use env_logger::Env;

/// Initializes env_logger with a sensible default filter.
///
/// `--verbose` lowers the default to debug; setting `RUST_LOG` overrides
/// either default.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

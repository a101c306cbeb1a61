//! Command-line interface implementation for nimata.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for nimata.
#[derive(Parser, Debug)]
#[command(author, version, about = "nimata: template engine for project scaffolding", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template file against a JSON context
    Render {
        /// Path to the template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Path to a JSON file with context values
        #[arg(short, long, value_name = "CONTEXT")]
        context: Option<PathBuf>,

        /// Refuse to render when validation reports errors
        #[arg(long)]
        check: bool,
    },

    /// Validate a template file and report findings
    Validate {
        /// Path to the template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,
    },

    /// List template definitions available in a store directory
    List {
        /// Directory containing template definitions
        #[arg(value_name = "TEMPLATES_DIR")]
        templates_dir: PathBuf,
    },

    /// Generate project files from a named template definition
    Generate {
        /// Name of the template definition
        #[arg(value_name = "NAME")]
        name: String,

        /// Directory containing template definitions
        #[arg(short = 'd', long, value_name = "TEMPLATES_DIR")]
        templates_dir: PathBuf,

        /// Directory where the generated files will be created
        #[arg(short, long, value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Path to a JSON file with answers for declared variables
        #[arg(short, long, value_name = "CONTEXT")]
        context: Option<PathBuf>,

        /// Force overwrite of existing output directory
        #[arg(short, long)]
        force: bool,
    },
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                    .unwrap();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

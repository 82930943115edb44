//! CLI argument definitions using clap
//!
//! Commands:
//! - fieldguard check [--request <file>] [--required <path>]... [--optional <path>]...
//! - fieldguard schemas --schema-dir <dir>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fieldguard - validate request data against required paths and schemas
#[derive(Parser, Debug)]
#[command(name = "fieldguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a single request and print the errors as JSON
    Check(CheckArgs),

    /// List the schemas found in a schema directory
    Schemas {
        /// Directory of `<name>.json` schema files
        #[arg(long)]
        schema_dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Request JSON file (reads stdin when omitted)
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Extra required path (repeatable)
    #[arg(long = "required", value_name = "PATH")]
    pub required: Vec<String>,

    /// Extra optional path (repeatable)
    #[arg(long = "optional", value_name = "PATH")]
    pub optional: Vec<String>,

    /// Directory of named schema files
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Named schema to use as the primary schema
    #[arg(long, requires = "schema_dir")]
    pub model: Option<String>,

    /// Validator settings file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit non-zero when any field error remains
    #[arg(long)]
    pub fail_on_errors: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

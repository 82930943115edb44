//! CLI module for fieldguard
//!
//! Provides command-line interface for:
//! - check: validate one request read from a file or stdin
//! - schemas: list schemas in a schema directory

mod args;
mod commands;
mod errors;
mod io;

pub use args::{CheckArgs, Cli, Command};
pub use commands::{build_request, build_validator, check, run, run_command, schemas};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_request_file, write_error, write_response};

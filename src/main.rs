//! fieldguard CLI entry point
//!
//! Installs logging (stderr, `RUST_LOG`, default `warn`), then delegates
//! to the CLI module. Errors are printed to stderr with a non-zero exit.

use fieldguard::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

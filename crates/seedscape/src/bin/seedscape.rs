//! `seedscape` command-line entry point.

use anyhow::Result;
use clap::Parser;
use seedscape::{execute, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -v wins over RUST_LOG; without either, only warnings
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = execute(&cli)?;
    println!("{output}");
    Ok(())
}

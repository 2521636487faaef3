//! Lunar CLI: list and check precompiled chunks.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage error, or at least one input failed to load

mod commands;
mod listing;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "lunar", version, about = "Inspect precompiled Lunar chunks")]
struct Cli {
    /// Log chunk decoding details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a disassembly of each chunk
    List {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Load each chunk and report whether it is well formed
    Check {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::List { files } => commands::list(files),
        Command::Check { files } => commands::check(files),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,lunar=debug,lunar_chunk=debug,lunar_state=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

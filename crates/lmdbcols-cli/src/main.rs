//! lmdbcols CLI - Command-line tools for lmdbcols store files

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "lmdbcols")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exercise padded collections against a new scratch store file
    Selftest {
        /// Path of the store file to create (must not exist)
        db_path: PathBuf,

        /// Keep the store file after a successful run
        #[arg(short, long)]
        keep: bool,
    },

    /// Store configuration and page statistics
    Status {
        /// Path of the store file
        db_path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Selftest { db_path, keep } => {
            commands::selftest::execute(db_path, keep)?;
        }
        Commands::Status { db_path, json } => {
            commands::status::execute(db_path, json)?;
        }
    }

    Ok(())
}

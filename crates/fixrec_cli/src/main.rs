//! fixrec CLI
//!
//! Command-line tools for fixed-width record files.
//!
//! # Commands
//!
//! - `inspect` - Display the file header and check the file length
//! - `dump` - Hex-dump records, in slot order or ring order
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// fixrec command-line record file tools.
#[derive(Parser)]
#[command(name = "fixrec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the record file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the file header and check the file length
    Inspect {
        /// Read the file with the ring header layout
        #[arg(short, long)]
        ring: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Hex-dump records
    Dump {
        /// Walk the file as a ring, oldest record first
        #[arg(short, long)]
        ring: bool,

        /// Ring capacity (defaults to the stored record count)
        #[arg(short, long)]
        capacity: Option<u32>,

        /// Maximum number of records to dump
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { ring, format } => {
            let path = cli.path.ok_or("Record file path required for inspect")?;
            commands::inspect::run(&path, ring, &format)?;
        }
        Commands::Dump {
            ring,
            capacity,
            limit,
        } => {
            let path = cli.path.ok_or("Record file path required for dump")?;
            commands::dump::run(
                &path,
                commands::dump::DumpOptions {
                    ring,
                    capacity,
                    limit,
                },
            )?;
        }
        Commands::Version => {
            println!("fixrec CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("fixrec core v{}", fixrec_core::VERSION);
        }
    }

    Ok(())
}

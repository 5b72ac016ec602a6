//! givens CLI - compile and inspect module fragments

#![warn(missing_docs)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{compile, inspect};

#[derive(Parser)]
#[command(name = "givens")]
#[command(about = "Compile-time dependency injection compiler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the transformation pipeline over a serialized module fragment
    Compile {
        /// Input module fragment (JSON)
        input: PathBuf,

        /// Output path for the transformed fragment (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compile level (transform, standard, aggressive)
        #[arg(short, long, default_value = "standard")]
        level: String,

        /// Write human-readable IR dumps into this directory
        #[arg(long)]
        dump_ir: Option<PathBuf>,

        /// Skip aggregate marker synthesis
        #[arg(long)]
        no_aggregates: bool,

        /// Print statistics after compiling
        #[arg(long)]
        stats: bool,
    },

    /// Print a human-readable rendering of a module fragment
    Inspect {
        /// Input module fragment (JSON)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Compile {
            input,
            output,
            level,
            dump_ir,
            no_aggregates,
            stats,
        } => compile::run(compile::CompileArgs {
            input,
            output,
            level,
            dump_ir,
            no_aggregates,
            stats,
        }),
        Commands::Inspect { input } => inspect::run(&input),
    }
}

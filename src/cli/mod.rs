//! Command-line interface for completion-context
//!
//! Provides `summarize` and `prompt` subcommands for exercising the context
//! pipeline offline, without an editor or a completion backend.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod prompt;
mod summarize;

/// Context assembly engine for AI code completion
#[derive(Parser)]
#[command(name = "completion-context")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the structural summary of a source file and its local imports
    Summarize(summarize::SummarizeArgs),

    /// Build and print the completion prompt for a cursor position
    Prompt(prompt::PromptArgs),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Summarize(args) => summarize::run(args),
        Commands::Prompt(args) => prompt::run(args).await,
    }
}

//! `summarize` subcommand

use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

use crate::config::load_config;
use crate::domain::FidelityMode;
use crate::summary::Summarizer;

#[derive(Args)]
pub struct SummarizeArgs {
    /// Source file to summarize
    pub file: PathBuf,

    /// Fidelity mode (defaults to the configured mode)
    #[arg(long, value_enum)]
    pub mode: Option<FidelityMode>,

    /// Read the file content from stdin instead of disk (for unsaved
    /// editor buffers)
    #[arg(long)]
    pub stdin: bool,

    /// Explicit config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: SummarizeArgs) -> Result<()> {
    let root = args
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&root, args.config.as_deref())?;
    let mode = args.mode.unwrap_or(config.fidelity_mode);

    let content = if args.stdin {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("Failed reading stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed reading {}", args.file.display()))?
    };

    let summarizer = Summarizer::new(mode, config.privacy_prefix);
    println!("{}", summarizer.summarize(&args.file, &content));
    Ok(())
}

//! `prompt` subcommand

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::load_config;
use crate::domain::ModelType;
use crate::editor::{CompletionRequest, DocumentSnapshot};
use crate::prompt::build_prompt;
use crate::providers::default_providers;
use crate::summary::SourceLanguage;

#[derive(Args)]
pub struct PromptArgs {
    /// Source file the cursor sits in
    pub file: PathBuf,

    /// Byte offset of the cursor into the file
    #[arg(long)]
    pub cursor: usize,

    /// Model family to render for (defaults to the configured model)
    #[arg(long, value_enum)]
    pub model: Option<ModelType>,

    /// Other open files to include as context (repeatable)
    #[arg(long = "open")]
    pub open_files: Vec<PathBuf>,

    /// Workspace root for VCS queries (defaults to the file's directory)
    #[arg(long)]
    pub workspace_root: Option<PathBuf>,

    /// Include the staged VCS diff as context
    #[arg(long)]
    pub diff: bool,

    /// Explicit config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: PromptArgs) -> Result<()> {
    let root = args.workspace_root.clone().unwrap_or_else(|| {
        args.file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let mut config = load_config(&root, args.config.as_deref())?;
    // Offline prompt inspection only shells out to git when asked to.
    config.enable_vcs_diff = args.diff;
    let model = args.model.unwrap_or(config.model_type);

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed reading {}", args.file.display()))?;

    let language_id = match SourceLanguage::from_path(&args.file) {
        Some(SourceLanguage::TypeScript) => "typescript",
        Some(SourceLanguage::Tsx) => "typescriptreact",
        Some(SourceLanguage::JavaScript) => "javascript",
        Some(SourceLanguage::Python) => "python",
        None => "plaintext",
    };

    let request = CompletionRequest {
        document: DocumentSnapshot {
            uri: format!("file://{}", args.file.display()),
            language_id: language_id.to_string(),
            path: args.file.clone(),
            text,
        },
        cursor: args.cursor,
        open_files: args.open_files.clone(),
        workspace_root: Some(root),
    };

    let providers = default_providers(&config);
    let prompt = build_prompt(&providers, &request, model).await?;
    println!("{prompt}");
    Ok(())
}

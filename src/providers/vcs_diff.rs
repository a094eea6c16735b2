//! Staged-diff provider
//!
//! Zero or one snippet containing the staged diff for the workspace root,
//! obtained by shelling out to git. Any failure mode (no root, no git, not
//! a repository, stderr output, empty diff) yields nothing.

use crate::domain::ContextSnippet;
use crate::editor::CompletionRequest;
use crate::providers::ContextProvider;
use async_trait::async_trait;
use tokio::process::Command;

pub const VCS_DIFF_PRIORITY: i32 = 80;

pub struct VcsDiffProvider;

impl VcsDiffProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VcsDiffProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextProvider for VcsDiffProvider {
    fn name(&self) -> &'static str {
        "vcs-diff"
    }

    async fn provide(&self, request: &CompletionRequest) -> Vec<ContextSnippet> {
        let Some(root) = &request.workspace_root else {
            return Vec::new();
        };

        let output = match Command::new("git")
            .arg("-C")
            .arg(root)
            .args(["diff", "--cached"])
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(error = %e, "git invocation failed");
                return Vec::new();
            }
        };

        if !output.status.success() || !output.stderr.is_empty() {
            tracing::debug!(root = %root.display(), "git diff unavailable");
            return Vec::new();
        }

        let diff = String::from_utf8_lossy(&output.stdout);
        if diff.trim().is_empty() {
            return Vec::new();
        }

        vec![ContextSnippet::new(format!("Staged changes:\n{diff}"), VCS_DIFF_PRIORITY)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::DocumentSnapshot;
    use std::path::PathBuf;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn request(root: Option<PathBuf>) -> CompletionRequest {
        CompletionRequest {
            document: DocumentSnapshot {
                uri: "file:///main.ts".to_string(),
                language_id: "typescript".to_string(),
                path: PathBuf::from("/main.ts"),
                text: String::new(),
            },
            cursor: 0,
            open_files: Vec::new(),
            workspace_root: root,
        }
    }

    #[tokio::test]
    async fn no_workspace_root_yields_nothing() {
        let snippets = VcsDiffProvider::new().provide(&request(None)).await;
        assert!(snippets.is_empty());
    }

    #[tokio::test]
    async fn non_repository_yields_nothing() {
        let tmp = TempDir::new().expect("tmp");
        let snippets =
            VcsDiffProvider::new().provide(&request(Some(tmp.path().to_path_buf()))).await;
        assert!(snippets.is_empty());
    }

    #[tokio::test]
    async fn staged_change_produces_one_snippet() {
        let tmp = TempDir::new().expect("tmp");
        let git = |args: &[&str]| {
            StdCommand::new("git").arg("-C").arg(tmp.path()).args(args).output()
        };
        // Environment without git: nothing to verify here.
        let Ok(init) = git(&["init"]) else { return };
        if !init.status.success() {
            return;
        }
        let _ = git(&["config", "user.email", "t@example.com"]);
        let _ = git(&["config", "user.name", "t"]);
        std::fs::write(tmp.path().join("a.txt"), "hello\n").expect("write");
        let _ = git(&["add", "a.txt"]);

        let snippets =
            VcsDiffProvider::new().provide(&request(Some(tmp.path().to_path_buf()))).await;
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].content.starts_with("Staged changes:"));
        assert!(snippets[0].content.contains("a.txt"));
        assert_eq!(snippets[0].priority, VCS_DIFF_PRIORITY);
    }
}

//! System-git implementation of the version-control operations.
//!
//! Every operation shells out to the git binary with the working directory
//! pinned to the project root, mirroring what an operator would type.

use crate::error::{GitError, Result};
use crate::git::VersionControl;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Version control backed by the system git binary
#[derive(Debug)]
pub struct SystemGit {
    root: PathBuf,
}

impl SystemGit {
    /// Create a handle rooted at the project checkout.
    ///
    /// Verifies up front that a git binary is on PATH so later phases fail
    /// with a clear diagnostic instead of a spawn error mid-run.
    pub fn new(root: PathBuf) -> Result<Self> {
        which::which("git").map_err(|e| GitError::NotAvailable {
            reason: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Run a git subcommand and return its trimmed stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        let rendered = format!("git {}", args.join(" "));
        log::debug!("running {rendered} in {}", self.root.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| GitError::CommandFailed {
                command: rendered.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: rendered,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VersionControl for SystemGit {
    async fn last_commit_message(&self) -> Result<String> {
        self.run(&["log", "-1", "--pretty=%B"]).await
    }

    async fn stage(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy().into_owned();
        self.run(&["add", &path]).await?;
        Ok(())
    }

    async fn amend_last_commit(&self) -> Result<()> {
        self.run(&["commit", "--amend", "--no-edit"]).await?;
        Ok(())
    }

    async fn force_push_current_branch(&self) -> Result<()> {
        self.run(&["push", "--force", "origin", "HEAD"]).await?;
        Ok(())
    }
}

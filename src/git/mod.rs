//! Version-control operations for release publishing.
//!
//! This module defines the [`VersionControl`] trait that specifies the exact
//! git operations the workflow invokes. The system-git implementation lives
//! in [`system_git`]; the orchestrator is generic over the trait so it can be
//! tested with fakes implementing the same contract.

mod system_git;

pub use system_git::SystemGit;

use crate::error::Result;
use std::future::Future;
use std::path::Path;

/// The version-control operations the publishing workflow invokes
pub trait VersionControl {
    /// Subject and body of the most recent commit, as one text block
    fn last_commit_message(&self) -> impl Future<Output = Result<String>>;

    /// Stage a path for the next commit
    fn stage(&self, path: &Path) -> impl Future<Output = Result<()>>;

    /// Amend the most recent commit without editing its message
    fn amend_last_commit(&self) -> impl Future<Output = Result<()>>;

    /// Force-update the remote reference of the current branch
    fn force_push_current_branch(&self) -> impl Future<Output = Result<()>>;
}

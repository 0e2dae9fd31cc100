//! The release-publishing workflow.
//!
//! A small idempotent state machine with external side effects: each phase
//! completes (or fails) before the next begins, and a failed run is always
//! safe to repeat because stale-release cleanup removes whatever the prior
//! run left behind. No rollback of remote state is attempted; a release
//! created but left without an asset is a visible failure mode fixed by
//! re-running.

mod phases;

pub use phases::{PhaseContext, PublishOutcome, ReleasePhase, execute_phases};

use crate::cli::OutputManager;
use crate::error::Result;
use crate::git::SystemGit;
use crate::github::GitHubReleaseClient;
use crate::{ReleaseConfig, credentials, version};

/// Run the full publishing workflow against the real collaborators.
pub async fn run_publish(config: &ReleaseConfig, output: &OutputManager) -> Result<PublishOutcome> {
    // ===== PHASE: RESOLVE VERSION =====
    output.verbose(&format!("phase: {}", ReleasePhase::ResolveVersion.label()));
    let version = version::resolve_version(&config.build_file_path())?;
    output.println(&format!("📦 Version: {version}"));

    // ===== PHASE: AUTHENTICATE =====
    output.verbose(&format!("phase: {}", ReleasePhase::Authenticate.label()));
    let credential = credentials::obtain_token(config).await?;
    output.success(&format!("Token acquired ({}...)", credential.redacted_prefix()));

    let host = GitHubReleaseClient::new(config, credential)?;
    let vcs = SystemGit::new(config.project_root.clone())?;

    let ctx = PhaseContext {
        config,
        host: &host,
        vcs: &vcs,
        output,
    };
    execute_phases(&ctx, &version).await
}

//! Phase execution for the publishing workflow.
//!
//! The executor covers every phase after version resolution and
//! authentication. It is generic over the release host and the version
//! control backend, so the whole sequence can be exercised against
//! in-memory fakes.

use crate::ReleaseConfig;
use crate::cli::OutputManager;
use crate::error::{ArtifactError, Result};
use crate::git::VersionControl;
use crate::github::{CreateReleaseRequest, ReleaseHost, ReleaseRecord, UploadedAsset};
use crate::notes;
use crate::readme::{ReadmeSyncOutcome, ReadmeSynchronizer};
use semver::Version;

/// States of the publishing state machine, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePhase {
    /// Extract the version from the build configuration
    ResolveVersion,
    /// Obtain the bearer token
    Authenticate,
    /// Delete any existing release with the target tag
    CleanupStale,
    /// Compose the release body
    ComposeNotes,
    /// Rewrite README.md and force-push the amendment
    SyncReadme,
    /// Create the remote release
    CreateRelease,
    /// Check the artifact exists and is non-empty
    LocateArtifact,
    /// Stream the artifact to the release
    UploadArtifact,
    /// Terminal success state
    Done,
}

impl ReleasePhase {
    /// Human-readable phase name for progress output
    pub fn label(self) -> &'static str {
        match self {
            ReleasePhase::ResolveVersion => "resolve version",
            ReleasePhase::Authenticate => "authenticate",
            ReleasePhase::CleanupStale => "cleanup stale release",
            ReleasePhase::ComposeNotes => "compose notes",
            ReleasePhase::SyncReadme => "sync readme",
            ReleasePhase::CreateRelease => "create release",
            ReleasePhase::LocateArtifact => "locate artifact",
            ReleasePhase::UploadArtifact => "upload artifact",
            ReleasePhase::Done => "done",
        }
    }
}

/// Collaborators and configuration shared by every phase
pub struct PhaseContext<'a, H, V> {
    /// Run configuration
    pub config: &'a ReleaseConfig,
    /// Remote release host
    pub host: &'a H,
    /// Local version control
    pub vcs: &'a V,
    /// Terminal output
    pub output: &'a OutputManager,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Version that was released
    pub version: Version,
    /// The created release
    pub release: ReleaseRecord,
    /// The uploaded asset
    pub asset: UploadedAsset,
}

fn enter<H, V>(ctx: &PhaseContext<'_, H, V>, phase: ReleasePhase) {
    ctx.output.verbose(&format!("phase: {}", phase.label()));
}

/// Execute the phases from stale-release cleanup through asset upload.
pub async fn execute_phases<H: ReleaseHost, V: VersionControl>(
    ctx: &PhaseContext<'_, H, V>,
    version: &Version,
) -> Result<PublishOutcome> {
    let tag = format!("v{version}");

    // ===== PHASE: CLEANUP STALE =====
    // At most one release may exist per tag; deleting first makes re-runs
    // idempotent. Deletion itself is best-effort, creation decides the run.
    enter(ctx, ReleasePhase::CleanupStale);
    match ctx.host.find_release(&tag).await? {
        Some(stale) => {
            ctx.output
                .println(&format!("🗑  Deleting existing release {tag} (id={})", stale.id));
            if let Err(e) = ctx.host.delete_release(stale.id).await {
                ctx.output
                    .warn(&format!("Could not delete release {}: {e}; continuing", stale.id));
            }
        }
        None => ctx.output.verbose(&format!("no existing release for {tag}")),
    }

    // ===== PHASE: COMPOSE NOTES =====
    enter(ctx, ReleasePhase::ComposeNotes);
    let body = notes::compose(ctx.config, ctx.vcs, version).await;

    // ===== PHASE: SYNC README =====
    // Runs before release creation; the release body above is composed
    // independently and does not depend on readme state.
    if ctx.config.sync_readme {
        enter(ctx, ReleasePhase::SyncReadme);
        let synchronizer = ReadmeSynchronizer::new(ctx.config, ctx.vcs, ctx.output);
        match synchronizer.sync(version, &body).await? {
            ReadmeSyncOutcome::Skipped => {}
            ReadmeSyncOutcome::Synced => ctx.output.success("README.md synchronized"),
        }
    }

    // ===== PHASE: CREATE RELEASE =====
    enter(ctx, ReleasePhase::CreateRelease);
    let request = CreateReleaseRequest {
        tag_name: tag.clone(),
        name: tag,
        body,
        draft: ctx.config.draft,
        prerelease: ctx.config.prerelease,
    };
    let release = ctx.host.create_release(&request).await?;
    ctx.output
        .success(&format!("Release created: {}", release.html_url));

    // ===== PHASE: LOCATE ARTIFACT =====
    enter(ctx, ReleasePhase::LocateArtifact);
    let artifact = ctx.config.artifact_path();
    let metadata = match tokio::fs::metadata(&artifact).await {
        Ok(metadata) => metadata,
        Err(_) => return Err(ArtifactError::Missing { path: artifact }.into()),
    };
    if metadata.len() == 0 {
        return Err(ArtifactError::Empty { path: artifact }.into());
    }
    let asset_name = ctx.config.asset_name(version);

    // ===== PHASE: UPLOAD ARTIFACT =====
    enter(ctx, ReleasePhase::UploadArtifact);
    let endpoint = ctx.host.resolve_upload_endpoint(release.id).await?;
    let mib = metadata.len() as f64 / (1024.0 * 1024.0);
    ctx.output
        .println(&format!("📤 Uploading {asset_name} ({mib:.1} MiB)..."));
    let asset = ctx
        .host
        .upload_asset(&endpoint, &asset_name, &artifact, &ctx.config.asset_content_type)
        .await?;
    ctx.output
        .success(&format!("Uploaded: {}", asset.browser_download_url));

    enter(ctx, ReleasePhase::Done);
    Ok(PublishOutcome {
        version: version.clone(),
        release,
        asset,
    })
}

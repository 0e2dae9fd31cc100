//! # DouluoBridge Release
//!
//! Publishes a DouluoBridge Android release to GitHub in one pass.
//!
//! The workflow resolves the version from the Gradle build script, obtains a
//! token from the local git credential helper, replaces any stale release
//! carrying the same tag, composes release notes, optionally rewrites
//! README.md (amending and force-pushing the last commit), creates the
//! release, and streams the APK to it in bounded-size chunks.
//!
//! ## Usage
//!
//! ```bash
//! douluo_bridge_release                    # release from the current directory
//! douluo_bridge_release /path/to/checkout  # release another checkout
//! douluo_bridge_release --use-release-log  # body from RELEASE_LOG.md
//! ```
//!
//! Re-running after a failure is always safe: the stale-release cleanup
//! removes whatever the previous run left behind before creating anew.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod credentials;
pub mod error;
pub mod git;
pub mod github;
pub mod notes;
pub mod publish;
pub mod readme;
pub mod version;

// Re-export main types for public API
pub use cli::{Args, OutputManager};
pub use credentials::{Credential, CredentialStore, GitCredentialHelper};
pub use error::{ReleaseError, Result};
pub use git::{SystemGit, VersionControl};
pub use github::{GitHubReleaseClient, ReleaseHost, ReleaseRecord, RepoSlug};
pub use notes::NotesSource;
pub use publish::{PublishOutcome, run_publish};

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one publishing run, constructed once at startup and
/// passed by reference to every component.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// GitHub repository the release is published to
    pub repo: RepoSlug,
    /// Root of the local project checkout
    pub project_root: PathBuf,
    /// Build configuration declaring the version, relative to the root
    pub build_file: PathBuf,
    /// Build artifact to upload, relative to the root
    pub artifact: PathBuf,
    /// Readme document, relative to the root
    pub readme: PathBuf,
    /// Hand-written release notes file, relative to the root
    pub release_log: PathBuf,
    /// Asset filename stem; the version and `.apk` suffix are appended
    pub asset_stem: String,
    /// MIME type sent with the asset upload
    pub asset_content_type: String,
    /// Where the release body comes from
    pub notes_source: NotesSource,
    /// Whether to rewrite README.md and force-push the amendment
    pub sync_readme: bool,
    /// Create the release as a draft
    pub draft: bool,
    /// Mark the release as a prerelease
    pub prerelease: bool,
    /// Base URL of the hosting API
    pub api_base: String,
    /// Protocol passed to the credential helper
    pub credential_protocol: String,
    /// Host passed to the credential helper
    pub credential_host: String,
    /// Upper bound on the artifact upload request
    pub upload_timeout: Duration,
    /// Token supplied via environment or flag, bypassing the helper
    pub token_override: Option<String>,
}

impl ReleaseConfig {
    /// Create a configuration with the standard DouluoBridge layout rooted at
    /// `project_root`.
    pub fn for_project(project_root: PathBuf, repo: RepoSlug) -> Self {
        Self {
            repo,
            project_root,
            build_file: PathBuf::from("android/app/build.gradle.kts"),
            artifact: PathBuf::from("android/app/build/outputs/apk/release/app-release.apk"),
            readme: PathBuf::from("README.md"),
            release_log: PathBuf::from("RELEASE_LOG.md"),
            asset_stem: "DouluoBridge-Android".to_string(),
            asset_content_type: "application/vnd.android.package-archive".to_string(),
            notes_source: NotesSource::LastCommit,
            sync_readme: true,
            draft: false,
            prerelease: false,
            api_base: "https://api.github.com".to_string(),
            credential_protocol: "https".to_string(),
            credential_host: "github.com".to_string(),
            upload_timeout: Duration::from_secs(600),
            token_override: None,
        }
    }

    /// Absolute path of the build configuration file
    pub fn build_file_path(&self) -> PathBuf {
        self.project_root.join(&self.build_file)
    }

    /// Absolute path of the artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.project_root.join(&self.artifact)
    }

    /// Absolute path of the readme document
    pub fn readme_path(&self) -> PathBuf {
        self.project_root.join(&self.readme)
    }

    /// Absolute path of the release-log file
    pub fn release_log_path(&self) -> PathBuf {
        self.project_root.join(&self.release_log)
    }

    /// Canonical asset name for a version, e.g. `DouluoBridge-Android-v1.8.15.apk`
    pub fn asset_name(&self, version: &semver::Version) -> String {
        format!("{}-v{}.apk", self.asset_stem, version)
    }

    /// Relative readme path as staged in git
    pub fn readme_repo_path(&self) -> &Path {
        &self.readme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_name_embeds_version() {
        let config = ReleaseConfig::for_project(
            PathBuf::from("."),
            RepoSlug::parse("pemagic/DouluoBridge").expect("valid slug"),
        );
        let version = semver::Version::parse("2.0.0").expect("valid version");
        assert_eq!(config.asset_name(&version), "DouluoBridge-Android-v2.0.0.apk");
    }

    #[test]
    fn paths_are_rooted_at_project() {
        let config = ReleaseConfig::for_project(
            PathBuf::from("/srv/checkout"),
            RepoSlug::parse("pemagic/DouluoBridge").expect("valid slug"),
        );
        assert_eq!(
            config.build_file_path(),
            PathBuf::from("/srv/checkout/android/app/build.gradle.kts")
        );
        assert_eq!(
            config.artifact_path(),
            PathBuf::from("/srv/checkout/android/app/build/outputs/apk/release/app-release.apk")
        );
    }
}

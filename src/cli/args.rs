//! Command line argument parsing and validation.
//!
//! The tool is designed to "just work": point it at a checkout, it releases.
//! Every flag maps onto one field of the run configuration.

use crate::github::RepoSlug;
use crate::notes::NotesSource;
use crate::{ReleaseConfig, error::Result};
use clap::Parser;
use std::path::PathBuf;

/// Publish a DouluoBridge Android release to GitHub
#[derive(Parser, Debug)]
#[command(
    name = "douluo_bridge_release",
    version,
    about = "Publish a DouluoBridge Android release to GitHub",
    long_about = "Resolve the version from the Gradle build script, replace any stale \
release with the same tag, compose release notes, optionally rewrite README.md, \
create the release, and stream the APK to it.

Usage:
  douluo_bridge_release
  douluo_bridge_release /path/to/checkout
  douluo_bridge_release --use-release-log --skip-readme"
)]
pub struct Args {
    /// Project root containing the Android build tree
    #[arg(value_name = "PROJECT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// GitHub repository in owner/repo form
    #[arg(long, value_name = "OWNER/REPO", default_value = "pemagic/DouluoBridge")]
    pub repo: String,

    /// Read the release body from RELEASE_LOG.md instead of the last commit message
    #[arg(long)]
    pub use_release_log: bool,

    /// Leave README.md alone (skips the amend and force-push)
    #[arg(long)]
    pub skip_readme: bool,

    /// Create the release as a draft
    #[arg(long)]
    pub draft: bool,

    /// Mark the release as a prerelease
    #[arg(long)]
    pub prerelease: bool,

    /// GitHub token; falls back to `git credential fill` when unset
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Show verbose progress output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress progress output (errors are still shown)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the run configuration from the parsed arguments
    pub fn into_config(self) -> Result<ReleaseConfig> {
        let repo = RepoSlug::parse(&self.repo)?;
        let mut config = ReleaseConfig::for_project(self.root, repo);
        if self.use_release_log {
            config.notes_source = NotesSource::ReleaseLog;
        }
        config.sync_readme = !self.skip_readme;
        config.draft = self.draft;
        config.prerelease = self.prerelease;
        config.token_override = self.token;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).expect("arguments parse")
    }

    #[test]
    fn defaults_select_commit_notes_and_readme_sync() {
        let config = parse(&["douluo_bridge_release"])
            .into_config()
            .expect("config builds");
        assert_eq!(config.notes_source, NotesSource::LastCommit);
        assert!(config.sync_readme);
        assert!(!config.draft);
        assert_eq!(config.repo.to_string(), "pemagic/DouluoBridge");
    }

    #[test]
    fn release_log_flag_selects_the_file_variant() {
        let config = parse(&["douluo_bridge_release", "--use-release-log", "--skip-readme"])
            .into_config()
            .expect("config builds");
        assert_eq!(config.notes_source, NotesSource::ReleaseLog);
        assert!(!config.sync_readme);
    }

    #[test]
    fn malformed_repo_is_rejected() {
        let err = parse(&["douluo_bridge_release", "--repo", "not-a-slug"]).into_config();
        assert!(err.is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["douluo_bridge_release", "-v", "-q"]).is_err());
    }
}

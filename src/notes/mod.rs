//! Release-note composition.
//!
//! The body of a release is cosmetic: it is never allowed to fail the run.
//! The default variant turns the most recent commit message into a bullet
//! list; the alternative reads a hand-written release log. Either way a
//! minimal default body containing just the version stands in when the
//! source is unavailable.

use crate::ReleaseConfig;
use crate::git::VersionControl;
use semver::Version;
use std::path::Path;

/// Bullet used when the commit message carries no usable text
const MAINTENANCE_LINE: &str = "- Maintenance release";

/// Where the release body comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesSource {
    /// Subject and body of the most recent commit, one bullet per line
    LastCommit,
    /// Verbatim contents of the release-log file
    ReleaseLog,
}

/// Compose the release body for a run.
pub async fn compose<V: VersionControl>(
    config: &ReleaseConfig,
    vcs: &V,
    version: &Version,
) -> String {
    match config.notes_source {
        NotesSource::LastCommit => compose_from_last_commit(vcs, version).await,
        NotesSource::ReleaseLog => {
            compose_from_release_log(&config.release_log_path(), version).await
        }
    }
}

/// Reformat the latest commit message as a bullet list.
pub async fn compose_from_last_commit<V: VersionControl>(vcs: &V, version: &Version) -> String {
    match vcs.last_commit_message().await {
        Ok(message) => {
            let bullets = bullet_lines(&message);
            if bullets.is_empty() {
                MAINTENANCE_LINE.to_string()
            } else {
                bullets
            }
        }
        Err(e) => {
            log::warn!("could not read last commit message: {e}");
            fallback_body(version)
        }
    }
}

/// Read the hand-written release log, falling back to the default body.
pub async fn compose_from_release_log(path: &Path, version: &Version) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if !content.trim().is_empty() => content,
        Ok(_) => fallback_body(version),
        Err(e) => {
            log::warn!("could not read release log {}: {e}", path.display());
            fallback_body(version)
        }
    }
}

/// One bullet per non-empty line, whitespace trimmed.
pub fn bullet_lines(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Minimal body containing just the version.
pub fn fallback_body(version: &Version) -> String {
    format!("v{version} release")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_lines_become_bullets_in_order() {
        let notes = bullet_lines("Fix crash\nResolved a null pointer in combat module");
        assert_eq!(
            notes,
            "- Fix crash\n- Resolved a null pointer in combat module"
        );
    }

    #[test]
    fn blank_lines_between_subject_and_body_are_dropped() {
        let notes = bullet_lines("Fix crash\n\n  Resolved a null pointer in combat module  \n");
        assert_eq!(
            notes,
            "- Fix crash\n- Resolved a null pointer in combat module"
        );
    }

    #[test]
    fn empty_message_produces_no_bullets() {
        assert_eq!(bullet_lines("\n  \n"), "");
    }

    #[test]
    fn fallback_contains_just_the_version() {
        let version = Version::new(1, 8, 15);
        assert_eq!(fallback_body(&version), "v1.8.15 release");
    }

    #[tokio::test]
    async fn missing_release_log_falls_back_to_version_body() {
        let dir = tempfile::tempdir().expect("temp dir");
        let version = Version::new(1, 8, 15);
        let body =
            compose_from_release_log(&dir.path().join("RELEASE_LOG.md"), &version).await;
        assert_eq!(body, "v1.8.15 release");
    }

    #[tokio::test]
    async fn release_log_contents_pass_through_verbatim() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("RELEASE_LOG.md");
        std::fs::write(&path, "## Highlights\n\n- New combat module\n").expect("write log");
        let body = compose_from_release_log(&path, &Version::new(1, 8, 15)).await;
        assert_eq!(body, "## Highlights\n\n- New combat module\n");
    }
}

//! README synchronization.
//!
//! Two regions of the readme track the released version: the badge line near
//! the top and the "What's New" section. Both are replaced in place by
//! pattern, the file is written back atomically, and the change is folded
//! into the most recent commit, which is then force-pushed. A pattern that
//! matches nothing leaves the document unchanged; that case is logged as a
//! warning rather than failing the run.

use crate::ReleaseConfig;
use crate::cli::OutputManager;
use crate::error::Result;
use crate::git::VersionControl;
use regex::Regex;
use semver::Version;
use std::path::Path;
use std::sync::OnceLock;

/// Version token accepted inside the badge and heading patterns
const VERSION_TOKEN: &str = r"\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.-]+)?";

fn badge_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?m)^(>\s*\*\*Cross-Platform Edition\*\*\s+v){VERSION_TOKEN}"
        ))
        .expect("badge pattern is valid")
    })
}

fn feature_heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?m)^## What's New in v{VERSION_TOKEN}.*$"))
            .expect("feature heading pattern is valid")
    })
}

/// Result of a synchronization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeSyncOutcome {
    /// No readme document exists; nothing was done
    Skipped,
    /// The document was rewritten, amended into the last commit, and pushed
    Synced,
}

/// Replace the version token on the badge line, leaving the rest untouched.
///
/// Returns the (possibly unchanged) content and whether the pattern matched.
pub fn rewrite_badge(content: &str, version: &Version) -> (String, bool) {
    let re = badge_regex();
    if !re.is_match(content) {
        return (content.to_string(), false);
    }
    let replaced = re.replace(content, |caps: &regex::Captures<'_>| {
        format!("{}{version}", &caps[1])
    });
    (replaced.into_owned(), true)
}

/// Replace the "What's New" section with a fresh heading and bullet list.
///
/// The section runs from a heading matching any prior version up to, but not
/// including, the next `## ` sibling heading (or end of file). Returns the
/// (possibly unchanged) content and whether the heading matched.
pub fn rewrite_feature_section(content: &str, version: &Version, notes: &str) -> (String, bool) {
    let Some(heading) = feature_heading_regex().find(content) else {
        return (content.to_string(), false);
    };

    let next_sibling = content[heading.end()..]
        .find("\n## ")
        .map(|at| heading.end() + at + 1);

    let mut out = String::with_capacity(content.len() + notes.len());
    out.push_str(&content[..heading.start()]);
    out.push_str(&format!("## What's New in v{version}\n\n{notes}\n"));
    if let Some(section_start) = next_sibling {
        out.push('\n');
        out.push_str(&content[section_start..]);
    }
    (out, true)
}

/// Write content to `path` atomically: write a sibling temp file, then rename.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

/// Rewrites the readme regions and folds the change into recent history.
pub struct ReadmeSynchronizer<'a, V> {
    config: &'a ReleaseConfig,
    vcs: &'a V,
    output: &'a OutputManager,
}

impl<'a, V: VersionControl> ReadmeSynchronizer<'a, V> {
    /// Create a synchronizer over the run's configuration and repository
    pub fn new(config: &'a ReleaseConfig, vcs: &'a V, output: &'a OutputManager) -> Self {
        Self { config, vcs, output }
    }

    /// Synchronize the readme with the new version and notes.
    ///
    /// Absent document → [`ReadmeSyncOutcome::Skipped`], no error. Otherwise
    /// both regions are rewritten (each a documented no-op when its pattern
    /// matches nothing), the file is staged, the last commit amended, and the
    /// branch force-pushed.
    pub async fn sync(&self, version: &Version, notes: &str) -> Result<ReadmeSyncOutcome> {
        let path = self.config.readme_path();
        if !path.exists() {
            log::info!("no readme at {}, skipping sync", path.display());
            return Ok(ReadmeSyncOutcome::Skipped);
        }

        let content = std::fs::read_to_string(&path)?;

        let (content, badge_matched) = rewrite_badge(&content, version);
        if !badge_matched {
            log::warn!("readme badge pattern matched nothing; badge left as-is");
        }

        let (content, section_matched) = rewrite_feature_section(&content, version, notes);
        if !section_matched {
            log::warn!("readme feature heading matched nothing; section left as-is");
        }

        write_atomic(&path, &content)?;

        self.vcs.stage(self.config.readme_repo_path()).await?;
        self.vcs.amend_last_commit().await?;

        // Rewrites published history; said out loud every time it happens.
        self.output
            .warn("Force-pushing amended commit to origin (rewrites branch history)");
        self.vcs.force_push_current_branch().await?;

        Ok(ReadmeSyncOutcome::Synced)
    }
}

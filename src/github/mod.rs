//! GitHub release hosting: data model and client.
//!
//! The [`ReleaseHost`] trait captures exactly the remote operations the
//! workflow exercises; [`GitHubReleaseClient`] implements it over the REST
//! API. The orchestrator is generic over the trait so the full phase sequence
//! can run against an in-memory fake.

mod client;

pub use client::{GitHubReleaseClient, UPLOAD_CHUNK_BYTES};

use crate::error::{CliError, ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use url::Url;

/// A repository identified as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    /// Parse an `owner/repo` string
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(ReleaseError::Cli(CliError::InvalidArguments {
                reason: format!("Invalid repository '{value}'. Expected: owner/repo"),
            })),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A release as returned by the hosting API
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRecord {
    /// Numeric release id
    pub id: u64,
    /// Tag the release is bound to
    pub tag_name: String,
    /// Release title
    pub name: Option<String>,
    /// Release body text
    #[serde(default)]
    pub body: Option<String>,
    /// Whether the release is a draft
    pub draft: bool,
    /// Whether the release is marked as a prerelease
    pub prerelease: bool,
    /// Templated upload URL, e.g. `…/assets{?name,label}`
    pub upload_url: String,
    /// Human-facing release page
    pub html_url: String,
}

/// Payload for creating a release
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseRequest {
    /// Tag to create the release under
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Release body text
    pub body: String,
    /// Create as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
}

/// An asset as returned after upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    /// Asset filename
    pub name: String,
    /// Asset size in bytes
    pub size: u64,
    /// Stable download URL
    pub browser_download_url: String,
}

/// Remote operations the publishing workflow exercises
pub trait ReleaseHost {
    /// Look up a release by tag; absence (HTTP 404) is not an error
    fn find_release(&self, tag: &str) -> impl Future<Output = Result<Option<ReleaseRecord>>>;

    /// Delete a release by id; a missing release counts as deleted
    fn delete_release(&self, release_id: u64) -> impl Future<Output = Result<()>>;

    /// Create a release; failure is fatal for the run
    fn create_release(
        &self,
        request: &CreateReleaseRequest,
    ) -> impl Future<Output = Result<ReleaseRecord>>;

    /// Re-fetch the release and derive its base upload endpoint
    fn resolve_upload_endpoint(&self, release_id: u64) -> impl Future<Output = Result<Url>>;

    /// Stream an artifact to the upload endpoint as a named asset
    fn upload_asset(
        &self,
        endpoint: &Url,
        asset_name: &str,
        artifact: &Path,
        content_type: &str,
    ) -> impl Future<Output = Result<UploadedAsset>>;
}

/// Strip the `{?name,label}` template suffix from an upload URL.
pub fn strip_upload_template(upload_url: &str) -> &str {
    match upload_url.find('{') {
        Some(at) => &upload_url[..at],
        None => upload_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_repo() {
        let slug = RepoSlug::parse("pemagic/DouluoBridge").expect("valid slug");
        assert_eq!(slug.owner, "pemagic");
        assert_eq!(slug.name, "DouluoBridge");
        assert_eq!(slug.to_string(), "pemagic/DouluoBridge");
    }

    #[test]
    fn rejects_malformed_slugs() {
        for bad in ["pemagic", "a/b/c", "/repo", "owner/", ""] {
            assert!(RepoSlug::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn strips_upload_url_template() {
        assert_eq!(
            strip_upload_template(
                "https://uploads.github.com/repos/pemagic/DouluoBridge/releases/7/assets{?name,label}"
            ),
            "https://uploads.github.com/repos/pemagic/DouluoBridge/releases/7/assets"
        );
        // Already-plain URLs pass through untouched.
        assert_eq!(strip_upload_template("https://x/assets"), "https://x/assets");
    }

    #[test]
    fn create_request_serializes_the_wire_fields() {
        let request = CreateReleaseRequest {
            tag_name: "v1.8.15".to_string(),
            name: "v1.8.15".to_string(),
            body: "- Fix crash".to_string(),
            draft: false,
            prerelease: false,
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert_eq!(json["tag_name"], "v1.8.15");
        assert_eq!(json["name"], "v1.8.15");
        assert_eq!(json["body"], "- Fix crash");
        assert_eq!(json["draft"], false);
        assert_eq!(json["prerelease"], false);
    }

    #[test]
    fn release_record_deserializes_api_payload() {
        let payload = serde_json::json!({
            "id": 7,
            "tag_name": "v1.8.15",
            "name": "v1.8.15",
            "body": null,
            "draft": false,
            "prerelease": false,
            "upload_url": "https://uploads.github.com/repos/o/r/releases/7/assets{?name,label}",
            "html_url": "https://github.com/o/r/releases/tag/v1.8.15",
            "assets": []
        });
        let record: ReleaseRecord = serde_json::from_value(payload).expect("deserializes");
        assert_eq!(record.id, 7);
        assert_eq!(record.tag_name, "v1.8.15");
        assert!(record.body.is_none());
    }
}

//! REST client for the release endpoints.
//!
//! Only five endpoints are exercised: release lookup by tag, deletion by id,
//! creation, re-fetch by id (to learn the upload URL), and the asset upload
//! itself. The upload streams the artifact in fixed-size chunks so memory
//! stays proportional to the chunk size, not the artifact size; APKs run to
//! tens of megabytes.

use crate::ReleaseConfig;
use crate::credentials::Credential;
use crate::error::{ApiError, Result};
use crate::github::{
    CreateReleaseRequest, ReleaseHost, ReleaseRecord, RepoSlug, UploadedAsset,
    strip_upload_template,
};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use url::Url;

/// Upload chunk size; bounds memory use for large artifacts
pub const UPLOAD_CHUNK_BYTES: usize = 512 * 1024;

/// API media type sent with every request
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Release client over the GitHub REST API
pub struct GitHubReleaseClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoSlug,
    credential: Credential,
    upload_timeout: Duration,
}

impl GitHubReleaseClient {
    /// Create a client for the configured repository using the given token
    pub fn new(config: &ReleaseConfig, credential: Credential) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Request {
                operation: "client init",
                source,
            })?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            repo: config.repo.clone(),
            credential,
            upload_timeout: config.upload_timeout,
        })
    }

    fn releases_url(&self, suffix: &str) -> String {
        format!("{}/repos/{}/releases{}", self.api_base, self.repo, suffix)
    }

    fn authorization(&self) -> String {
        format!("token {}", self.credential.token())
    }

    async fn get_release(
        &self,
        url: &str,
        operation: &'static str,
    ) -> Result<Option<ReleaseRecord>> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|source| ApiError::Request { operation, source })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let record = response
                    .json::<ReleaseRecord>()
                    .await
                    .map_err(|e| ApiError::MalformedResponse {
                        operation,
                        reason: e.to_string(),
                    })?;
                Ok(Some(record))
            }
            status => Err(ApiError::Status {
                operation,
                status,
                body: response.text().await.unwrap_or_default(),
            }
            .into()),
        }
    }
}

impl ReleaseHost for GitHubReleaseClient {
    async fn find_release(&self, tag: &str) -> Result<Option<ReleaseRecord>> {
        let url = self.releases_url(&format!("/tags/{tag}"));
        self.get_release(&url, "find release").await
    }

    async fn delete_release(&self, release_id: u64) -> Result<()> {
        let operation = "delete release";
        let url = self.releases_url(&format!("/{release_id}"));
        let response = self
            .http
            .delete(&url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|source| ApiError::Request { operation, source })?;

        match response.status() {
            // Already gone counts as deleted.
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(ApiError::Status {
                operation,
                status,
                body: response.text().await.unwrap_or_default(),
            }
            .into()),
        }
    }

    async fn create_release(&self, request: &CreateReleaseRequest) -> Result<ReleaseRecord> {
        let operation = "create release";
        let response = self
            .http
            .post(self.releases_url(""))
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(request)
            .send()
            .await
            .map_err(|source| ApiError::Request { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                operation,
                status,
                body: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        response
            .json::<ReleaseRecord>()
            .await
            .map_err(|e| ApiError::MalformedResponse {
                operation,
                reason: e.to_string(),
            })
            .map_err(Into::into)
    }

    async fn resolve_upload_endpoint(&self, release_id: u64) -> Result<Url> {
        let url = self.releases_url(&format!("/{release_id}"));
        let record = self
            .get_release(&url, "resolve upload endpoint")
            .await?
            .ok_or(ApiError::MalformedResponse {
                operation: "resolve upload endpoint",
                reason: format!("release {release_id} disappeared before upload"),
            })?;

        let base = strip_upload_template(&record.upload_url);
        Url::parse(base).map_err(|e| {
            ApiError::InvalidUploadUrl {
                url: record.upload_url.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn upload_asset(
        &self,
        endpoint: &Url,
        asset_name: &str,
        artifact: &Path,
        content_type: &str,
    ) -> Result<UploadedAsset> {
        let operation = "upload asset";

        let size = tokio::fs::metadata(artifact).await?.len();
        let file = tokio::fs::File::open(artifact).await?;

        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("name", asset_name);

        log::debug!(
            "uploading {size} bytes as {asset_name} in {} chunk(s) of at most {UPLOAD_CHUNK_BYTES} bytes",
            chunk_count(size)
        );

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, size)
            .timeout(self.upload_timeout)
            .body(reqwest::Body::wrap_stream(asset_body_stream(file)))
            .send()
            .await
            .map_err(|source| ApiError::Request { operation, source })?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(ApiError::Status {
                operation,
                status,
                body: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        response
            .json::<UploadedAsset>()
            .await
            .map_err(|e| ApiError::MalformedResponse {
                operation,
                reason: e.to_string(),
            })
            .map_err(Into::into)
    }
}

/// Wrap a reader into the chunked stream used as the upload body
fn asset_body_stream<R: AsyncRead>(reader: R) -> ReaderStream<R> {
    ReaderStream::with_capacity(reader, UPLOAD_CHUNK_BYTES)
}

/// Number of chunks an upload of `size` bytes produces
fn chunk_count(size: u64) -> u64 {
    size.div_ceil(UPLOAD_CHUNK_BYTES as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::StreamExt;
    use std::io::Cursor;

    #[test]
    fn chunk_count_is_ceil_of_size_over_chunk() {
        let chunk = UPLOAD_CHUNK_BYTES as u64;
        assert_eq!(chunk_count(0), 0);
        assert_eq!(chunk_count(1), 1);
        assert_eq!(chunk_count(chunk), 1);
        assert_eq!(chunk_count(chunk + 1), 2);
        assert_eq!(chunk_count(chunk * 3), 3);
    }

    #[tokio::test]
    async fn stream_chunks_are_bounded_and_reassemble_exactly() {
        let size = UPLOAD_CHUNK_BYTES * 2 + 150_000;
        let payload: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();

        let mut stream = asset_body_stream(Cursor::new(payload.clone()));
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.expect("chunk reads"));
        }

        assert_eq!(chunks.len() as u64, chunk_count(size as u64));
        assert!(chunks.iter().all(|c| c.len() <= UPLOAD_CHUNK_BYTES));

        let reassembled: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(reassembled, payload);
    }

    #[tokio::test]
    async fn exact_multiple_of_chunk_size_produces_no_trailing_chunk() {
        let size = UPLOAD_CHUNK_BYTES * 2;
        let payload = vec![0xAB_u8; size];

        let mut stream = asset_body_stream(Cursor::new(payload));
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.expect("chunk reads"));
        }

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.iter().map(bytes::Bytes::len).sum::<usize>(), size);
    }
}

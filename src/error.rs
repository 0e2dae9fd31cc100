//! Error types for douluo_bridge_release operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for douluo_bridge_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all douluo_bridge_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Version resolution errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Credential helper errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// GitHub API errors
    #[error("GitHub API error: {0}")]
    Api(#[from] ApiError),

    /// Artifact location errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Version resolution errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Build configuration file could not be read
    #[error("Failed to read build configuration at {path}: {source}")]
    Unreadable {
        /// Path to the build configuration file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// No version declaration in the build configuration
    #[error("No `versionName` declaration found in {path}")]
    DeclarationNotFound {
        /// Path to the build configuration file
        path: PathBuf,
    },

    /// Version declaration carries no quoted value
    #[error("`versionName` declaration in {path} has no quoted value")]
    MissingQuotedValue {
        /// Path to the build configuration file
        path: PathBuf,
    },

    /// Version string is not a valid semantic version
    #[error("Failed to parse version '{version}': {source}")]
    ParseFailed {
        /// Version string as found in the build configuration
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },
}

/// Credential helper errors
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The credential helper subprocess could not run or exited non-zero
    #[error("Credential helper failed: {reason}")]
    HelperFailed {
        /// Reason for the error
        reason: String,
    },

    /// The credential helper answered without a password field
    #[error("No token returned by the credential helper for {host}")]
    NoToken {
        /// Host the token was requested for
        host: String,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// The git binary is not on PATH
    #[error("git is not available: {reason}")]
    NotAvailable {
        /// Reason for the error
        reason: String,
    },

    /// A git command exited non-zero or could not be spawned
    #[error("Command failed: {command} - {reason}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// GitHub API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level request failure
    #[error("Request failed during {operation}: {source}")]
    Request {
        /// Operation being performed
        operation: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with an unexpected status; the body is surfaced verbatim
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        /// Operation being performed
        operation: &'static str,
        /// HTTP status code
        status: reqwest::StatusCode,
        /// Response body, verbatim
        body: String,
    },

    /// The API answered successfully but the payload was not understood
    #[error("Malformed response during {operation}: {reason}")]
    MalformedResponse {
        /// Operation being performed
        operation: &'static str,
        /// Reason for the error
        reason: String,
    },

    /// The per-release upload endpoint could not be derived
    #[error("Invalid upload URL '{url}': {reason}")]
    InvalidUploadUrl {
        /// Upload URL as returned by the API
        url: String,
        /// Reason for the error
        reason: String,
    },
}

/// Artifact location errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file does not exist
    #[error("Artifact not found at {path}")]
    Missing {
        /// Expected artifact path
        path: PathBuf,
    },

    /// Artifact file exists but is empty
    #[error("Artifact at {path} is empty")]
    Empty {
        /// Artifact path
        path: PathBuf,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Version(VersionError::DeclarationNotFound { path }) => vec![
                format!("Check that {} declares versionName", path.display()),
                "Run from the repository root or pass the project root explicitly".to_string(),
            ],
            ReleaseError::Credential(_) => vec![
                "Verify the helper works: echo 'protocol=https\\nhost=github.com\\n' | git credential fill".to_string(),
                "Log in with: gh auth login".to_string(),
                "Or export GITHUB_TOKEN with a token that has repo scope".to_string(),
            ],
            ReleaseError::Artifact(ArtifactError::Missing { path }) => vec![
                format!("Build the release APK first; expected it at {}", path.display()),
                "Run: ./gradlew assembleRelease".to_string(),
            ],
            ReleaseError::Api(ApiError::Status { status, .. })
                if status.as_u16() == 401 || status.as_u16() == 403 =>
            {
                vec![
                    "Check that the token is valid and has repo scope".to_string(),
                    "Regenerate the token if it has expired".to_string(),
                ]
            }
            ReleaseError::Git(GitError::NotAvailable { .. }) => vec![
                "Install git and ensure it is on PATH".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

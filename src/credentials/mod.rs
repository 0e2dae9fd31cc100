//! Token acquisition through the git credential-helper protocol.
//!
//! Publishing authenticates with a bearer token that the local credential
//! helper already manages; this crate never stores a secret itself. The token
//! lives in process memory for the duration of the run and is only ever
//! logged as a short prefix.

use crate::ReleaseConfig;
use crate::error::{CredentialError, Result};
use std::future::Future;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Number of leading token characters that may appear in diagnostics
const REDACTED_PREFIX_LEN: usize = 6;

/// An opaque bearer token held only in process memory.
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for request headers
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Short non-secret prefix for diagnostics
    pub fn redacted_prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(REDACTED_PREFIX_LEN)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

// Debug must never leak the token into logs or panic messages.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({}...)", self.redacted_prefix())
    }
}

/// Source of the bearer token used against the hosting API
pub trait CredentialStore {
    /// Retrieve the token; fatal if none is available
    fn bearer_token(&self) -> impl Future<Output = Result<Credential>>;
}

/// Credential store backed by `git credential fill`.
#[derive(Debug, Clone)]
pub struct GitCredentialHelper {
    protocol: String,
    host: String,
}

impl GitCredentialHelper {
    /// Create a helper targeting the given protocol and host
    pub fn new(protocol: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
        }
    }

    /// Request body written to the helper's stdin
    pub fn request_body(&self) -> String {
        format!("protocol={}\nhost={}\n\n", self.protocol, self.host)
    }
}

impl CredentialStore for GitCredentialHelper {
    async fn bearer_token(&self) -> Result<Credential> {
        let mut child = Command::new("git")
            .args(["credential", "fill"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CredentialError::HelperFailed {
                reason: format!("could not spawn `git credential fill`: {e}"),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| CredentialError::HelperFailed {
            reason: "could not open helper stdin".to_string(),
        })?;
        stdin
            .write_all(self.request_body().as_bytes())
            .await
            .map_err(|e| CredentialError::HelperFailed {
                reason: format!("could not write helper request: {e}"),
            })?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CredentialError::HelperFailed {
                reason: format!("helper did not complete: {e}"),
            })?;

        if !output.status.success() {
            return Err(CredentialError::HelperFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_password(&stdout)
            .map(Credential::new)
            .ok_or_else(|| {
                CredentialError::NoToken {
                    host: self.host.clone(),
                }
                .into()
            })
    }
}

/// Extract the password field from a newline-delimited `key=value` answer.
fn parse_password(answer: &str) -> Option<&str> {
    answer
        .lines()
        .find_map(|line| line.strip_prefix("password="))
}

/// Obtain the bearer token for a run: the environment override wins, the
/// credential helper is the default path.
pub async fn obtain_token(config: &ReleaseConfig) -> Result<Credential> {
    if let Some(token) = &config.token_override {
        log::debug!("using token from environment override");
        return Ok(Credential::new(token.clone()));
    }

    GitCredentialHelper::new(
        config.credential_protocol.as_str(),
        config.credential_host.as_str(),
    )
    .bearer_token()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_follows_helper_protocol() {
        let helper = GitCredentialHelper::new("https", "github.com");
        assert_eq!(helper.request_body(), "protocol=https\nhost=github.com\n\n");
    }

    #[test]
    fn parses_password_from_answer() {
        let answer = "protocol=https\nhost=github.com\nusername=pemagic\npassword=ghp_abc123\n";
        assert_eq!(parse_password(answer), Some("ghp_abc123"));
    }

    #[test]
    fn answer_without_password_yields_none() {
        assert_eq!(parse_password("username=pemagic\n"), None);
    }

    #[test]
    fn debug_never_prints_the_full_token() {
        let credential = Credential::new("ghp_supersecrettoken");
        let rendered = format!("{credential:?}");
        assert_eq!(rendered, "Credential(ghp_su...)");
        assert!(!rendered.contains("supersecret"));
    }

    #[test]
    fn short_tokens_redact_without_panicking() {
        let credential = Credential::new("abc");
        assert_eq!(credential.redacted_prefix(), "abc");
    }
}

//! GitHub API error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::HttpError;

/// Errors that can occur when talking to the GitHub GraphQL API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Non-2xx, non-429 response. Logged with status and body at the call
    /// site, never retried.
    #[error("GitHub request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    /// Connection-level failure below the HTTP status layer.
    #[error("HTTP transport error: {0}")]
    Http(#[from] HttpError),

    /// The response carried a top-level `errors` array. Takes precedence
    /// over any partial `data` in the same body.
    #[error("GraphQL query returned errors: {0}")]
    GraphQl(String),

    /// A JSON-typed body that failed to parse, or a request body that
    /// failed to serialize.
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Only reachable when a retry ceiling is configured on the client.
    #[error("rate limited after {attempts} retries")]
    RateLimitExceeded { attempts: u32 },

    /// Filesystem failure while writing imported resources.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// App JWT signing failed or the token response had no `token` field.
    #[error("installation token exchange failed: {0}")]
    TokenExchange(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Aggregate failure after a full import fan-out.
    #[error("import failed for {failed} organization(s)")]
    Import { failed: usize },
}

impl GitHubError {
    /// Whether this error came back from the GraphQL layer rather than the
    /// transport beneath it.
    #[must_use]
    pub fn is_graphql(&self) -> bool {
        matches!(self, GitHubError::GraphQl(_))
    }

    /// Whether this error is the configured-ceiling rate-limit failure.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GitHubError::RateLimitExceeded { .. })
    }
}

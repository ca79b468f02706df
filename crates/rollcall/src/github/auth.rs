//! GitHub App installation-token exchange.
//!
//! GraphQL calls authenticate with an installation access token, not the App
//! key itself. The exchange works in two steps:
//!
//! 1. Sign a short-lived App JWT (RS256) with the organization's private key;
//!    the claims window is backdated 60s against clock skew and expires after
//!    ten minutes, the maximum GitHub accepts.
//! 2. POST the JWT to the installation access-token endpoint; the `token`
//!    field of the response becomes the bearer credential.
//!
//! The resulting token is cached on the organization for the process
//! lifetime. There is no refresh-on-expiry handling; import runs are
//! short-lived relative to the token.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use secrecy::ExposeSecret;
use serde::Serialize;

use super::error::GitHubError;
use crate::config::GitHubOrganization;
use crate::http::{HttpMethod, HttpRequest, HttpTransport};

const ACCESS_TOKEN_ACCEPT: &str = "application/vnd.github+json";

/// Claims GitHub expects in an App JWT.
#[derive(Debug, Serialize)]
struct AppJwtClaims<'a> {
    iat: i64,
    exp: i64,
    iss: &'a str,
}

/// Sign a short-lived App JWT for the given App id.
fn sign_app_jwt(app_id: &str, private_key_pem: &str) -> Result<String, GitHubError> {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| GitHubError::TokenExchange(format!("invalid app private key: {e}")))?;

    let now = Utc::now().timestamp();
    let claims = AppJwtClaims {
        iat: now - 60,
        exp: now + 600,
        iss: app_id,
    };

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| GitHubError::TokenExchange(format!("failed to sign app JWT: {e}")))
}

// Installation tokens are minted by the github.com app API even for
// organizations on other hosts.
fn access_tokens_url(installation_id: &str) -> String {
    format!("https://api.github.com/app/installations/{installation_id}/access_tokens")
}

/// Exchange the organization's App credentials for an installation token.
pub(crate) async fn fetch_installation_token(
    org: &GitHubOrganization,
    transport: &dyn HttpTransport,
) -> Result<String, GitHubError> {
    let jwt = sign_app_jwt(&org.app_id, org.private_key.expose_secret())?;
    let url = access_tokens_url(org.installation_id.expose_secret());

    let request = HttpRequest::new(HttpMethod::Post, url)
        .with_header("Accept", ACCESS_TOKEN_ACCEPT)
        .with_header("Authorization", format!("Bearer {jwt}"));

    let resp = transport.send(request).await?;
    if !resp.is_success() {
        let body = String::from_utf8_lossy(&resp.body).into_owned();
        tracing::error!(
            status = resp.status,
            body = %body,
            organization = %org.organization_name,
            "Installation token exchange failed"
        );
        return Err(GitHubError::Transport {
            status: resp.status,
            body,
        });
    }

    let payload: serde_json::Value = serde_json::from_slice(&resp.body)?;
    match payload.get("token").and_then(serde_json::Value::as_str) {
        Some(token) => Ok(token.to_string()),
        None => Err(GitHubError::TokenExchange(
            "access token response did not include a token".to_string(),
        )),
    }
}

/// The organization's bearer token, exchanging credentials on first use.
///
/// Concurrent first calls coalesce on one exchange; afterwards the cached
/// token is returned without touching the network.
pub(crate) async fn bearer_token<'a>(
    org: &'a GitHubOrganization,
    transport: &dyn HttpTransport,
) -> Result<&'a str, GitHubError> {
    org.bearer_token
        .get_or_try_init(|| fetch_installation_token(org, transport))
        .await
        .map(String::as_str)
}

//! External auth service client.
//!
//! Owners authenticate against the hosted backend's auth API; this server
//! only validates bearer tokens and looks accounts up by id. Validated
//! tokens are cached for a short TTL via `moka` so each request does not
//! round-trip to the auth service.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use shoplark_core::OwnerId;

use crate::config::BackendConfig;

/// How long a validated token stays cached.
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(60);

/// Errors that can occur when talking to the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token was rejected.
    #[error("invalid or expired token")]
    InvalidToken,

    /// No account exists for the requested id.
    #[error("user not found")]
    UserNotFound,

    /// The auth service returned an unexpected status.
    #[error("auth API error ({status}): {message}")]
    Api {
        /// HTTP status code returned.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An authenticated owner account.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Stable account id; every owner-scoped row is keyed by it.
    pub id: OwnerId,
    /// Account email, when the auth service exposes one.
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: OwnerId,
    email: Option<String>,
}

impl From<UserResponse> for AuthUser {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Client for the external auth service.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: SecretString,
    token_cache: Cache<String, AuthUser>,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let token_cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(TOKEN_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                service_key: config.service_key.clone(),
                token_cache,
            }),
        }
    }

    /// Validate a bearer token and return the account it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is rejected, or
    /// `AuthError::Http`/`AuthError::Api` if the auth service cannot be
    /// reached or misbehaves.
    pub async fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        if let Some(user) = self.inner.token_cache.get(token).await {
            return Ok(user);
        }

        let response = self
            .inner
            .client
            .get(format!("{}/auth/v1/user", self.inner.base_url))
            .header("apikey", self.inner.service_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response.text().await?));
        }

        let user: AuthUser = response.json::<UserResponse>().await?.into();
        self.inner
            .token_cache
            .insert(token.to_owned(), user.clone())
            .await;
        Ok(user)
    }

    /// Look up an account by id using the service key.
    ///
    /// Used by the store resolver to derive an owner's email when a template
    /// carries no settings link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no such account exists, or
    /// `AuthError::Http`/`AuthError::Api` on transport or service failures.
    pub async fn get_user_by_id(&self, id: OwnerId) -> Result<AuthUser, AuthError> {
        let response = self
            .inner
            .client
            .get(format!("{}/auth/v1/admin/users/{id}", self.inner.base_url))
            .header("apikey", self.inner.service_key.expose_secret())
            .bearer_auth(self.inner.service_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AuthError::UserNotFound);
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response.text().await?));
        }

        Ok(response.json::<UserResponse>().await?.into())
    }

    fn api_error(status: reqwest::StatusCode, body: String) -> AuthError {
        AuthError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        }
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.inner.base_url)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "invalid or expired token"
        );
        let err = AuthError::Api {
            status: 500,
            message: "boom".to_owned(),
        };
        assert_eq!(err.to_string(), "auth API error (500): boom");
    }

    #[test]
    fn test_user_response_deserializes() {
        let user: UserResponse = serde_json::from_str(
            r#"{"id":"5f8a1c4e-2b7d-4f6a-9e3c-1d2e3f4a5b6c","email":"owner@example.com"}"#,
        )
        .unwrap();
        assert_eq!(user.email.as_deref(), Some("owner@example.com"));
    }
}

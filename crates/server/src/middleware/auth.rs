//! Authentication extractor.
//!
//! Owner-facing routes require a bearer token issued by the external auth
//! service. The extractor validates the token (cached per [`crate::services::auth::AuthClient`])
//! and hands the handler the resolved account.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::services::auth::{AuthError, AuthUser};
use crate::state::AppState;

/// Extractor that requires a valid owner bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     RequireOwner(owner): RequireOwner,
/// ) -> Result<Json<ApiResponse<Vec<Product>>>> {
///     // owner.id scopes every query
/// }
/// ```
pub struct RequireOwner(pub AuthUser);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_owned()))?;

        let user = state.auth().validate_token(token).await.map_err(|err| {
            if matches!(err, AuthError::InvalidToken | AuthError::UserNotFound) {
                AppError::Unauthorized("Invalid or expired token".to_owned())
            } else {
                AppError::Auth(err)
            }
        })?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(user.id.to_string()),
                email: user.email.clone(),
                ..Default::default()
            }));
        });

        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/settings")
            .header(header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let parts = parts_with_auth("Basic abc123");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_rejects_empty() {
        let parts = parts_with_auth("Bearer   ");
        assert_eq!(bearer_token(&parts), None);
    }
}

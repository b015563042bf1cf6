//! Host-based tenant rewrite middleware.
//!
//! Requests arriving on a store hostname (`{subdomain}.{base_domain}` or a
//! custom domain) are rewritten to the path-based `/store/{subdomain}` route,
//! so hostname and path addressing serve the identical payload. API, health,
//! and static asset paths pass through untouched.

use axum::{
    extract::{Request, State},
    http::{Uri, header},
    middleware::Next,
    response::Response,
};

use crate::services::tenant::extract_subdomain;
use crate::state::AppState;

const SKIP_PREFIXES: &[&str] = &["/api", "/store", "/health", "/static"];

const ASSET_EXTENSIONS: &[&str] = &[
    "css", "js", "map", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "woff", "woff2", "txt",
    "xml",
];

/// Rewrite store-hostname requests to `/store/{subdomain}`.
pub async fn rewrite_tenant_host(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if should_skip(request.uri().path()) {
        return next.run(request).await;
    }

    let subdomain = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(|host| extract_subdomain(host, &state.config().base_domain));

    if let Some(subdomain) = subdomain {
        let path_and_query = match request.uri().query() {
            Some(query) => format!("/store/{subdomain}?{query}"),
            None => format!("/store/{subdomain}"),
        };
        match path_and_query.parse::<Uri>() {
            Ok(uri) => {
                tracing::debug!(%subdomain, "Rewriting store hostname request");
                *request.uri_mut() = uri;
            }
            Err(err) => {
                tracing::warn!(%subdomain, error = %err, "Tenant rewrite produced an invalid URI");
            }
        }
    }

    next.run(request).await
}

fn should_skip(path: &str) -> bool {
    if SKIP_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ASSET_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_prefixes() {
        assert!(should_skip("/api/settings"));
        assert!(should_skip("/store/alpine"));
        assert!(should_skip("/health"));
        assert!(should_skip("/static/logo.png"));
    }

    #[test]
    fn test_skip_asset_extensions() {
        assert!(should_skip("/favicon.ico"));
        assert!(should_skip("/app.js"));
        assert!(should_skip("/styles/site.css"));
    }

    #[test]
    fn test_page_paths_are_rewritten() {
        assert!(!should_skip("/"));
        assert!(!should_skip("/checkout"));
    }
}

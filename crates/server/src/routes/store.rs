//! Path-based public storefront route.
//!
//! `/store/{subdomain}` serves the identical payload to
//! `/api/store-templates/subdomain/{subdomain}`; the tenant middleware
//! rewrites hostname-addressed requests here.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::Result;
use crate::models::StoreView;
use crate::routes::ApiResponse;
use crate::services::resolver;
use crate::state::AppState;

/// `GET /store/{subdomain}`.
pub async fn show(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Result<Json<ApiResponse<StoreView>>> {
    let view = resolver::resolve_store(state.pool(), state.auth(), &subdomain).await?;
    Ok(Json(ApiResponse::new(view)))
}

//! Health check routes.

use axum::{Json, extract::State};
use serde_json::{Value as JsonValue, json};

use crate::db::RepositoryError;
use crate::error::Result;
use crate::state::AppState;

/// `GET /health` - process liveness.
pub async fn liveness() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}

/// `GET /health/ready` - readiness, pings the database.
pub async fn readiness(State(state): State<AppState>) -> Result<Json<JsonValue>> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(RepositoryError::from)?;
    Ok(Json(json!({ "status": "ready" })))
}

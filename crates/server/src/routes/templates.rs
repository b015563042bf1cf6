//! Base template gallery routes.
//!
//! The gallery is the set of starting-point designs owners pick from when
//! building a store. It is shared across accounts, so reads and writes are
//! not owner-scoped (auth is still required).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use shoplark_core::BaseTemplateId;

use crate::db::{BaseTemplatePatch, BaseTemplateRepository, NewBaseTemplate};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::BaseTemplate;
use crate::routes::ApiResponse;
use crate::state::AppState;

const TEMPLATE_NOT_FOUND: &str = "Template not found";

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub template_name: String,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    pub template_name: Option<String>,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

/// `GET /api/templates`.
pub async fn list(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
) -> Result<Json<ApiResponse<Vec<BaseTemplate>>>> {
    let rows = BaseTemplateRepository::new(state.pool()).list().await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// `GET /api/templates/{id}`.
pub async fn show(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
    Path(id): Path<BaseTemplateId>,
) -> Result<Json<ApiResponse<BaseTemplate>>> {
    let row = BaseTemplateRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(TEMPLATE_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `POST /api/templates`.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BaseTemplate>>)> {
    if body.template_name.trim().is_empty() {
        return Err(AppError::Validation("template_name is required".to_owned()));
    }
    let row = BaseTemplateRepository::new(state.pool())
        .create(NewBaseTemplate {
            template_name: body.template_name,
            theme_part: body.theme_part,
            header_part: body.header_part,
            section_part: body.section_part,
            footer_part: body.footer_part,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(row))))
}

/// `PUT /api/templates/{id}`.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
    Path(id): Path<BaseTemplateId>,
    Json(body): Json<UpdateTemplateRequest>,
) -> Result<Json<ApiResponse<BaseTemplate>>> {
    let patch = BaseTemplatePatch {
        template_name: body.template_name,
        theme_part: body.theme_part,
        header_part: body.header_part,
        section_part: body.section_part,
        footer_part: body.footer_part,
    };
    let row = BaseTemplateRepository::new(state.pool())
        .update(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(TEMPLATE_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `DELETE /api/templates/{id}`.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
    Path(id): Path<BaseTemplateId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = BaseTemplateRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(TEMPLATE_NOT_FOUND.to_owned()));
    }
    Ok(Json(ApiResponse::with_message((), "Template deleted")))
}

//! Store template routes.
//!
//! The owner-facing routes operate on the single template each account owns;
//! the subdomain and by-id routes are public and go through the resolver so
//! callers always receive the template merged with its payment-display asset.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use shoplark_core::{BaseTemplateId, StoreTemplateId, Subdomain};

use crate::db::{NewStoreTemplate, StoreTemplatePatch, StoreTemplateRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::{StoreTemplate, StoreView};
use crate::routes::ApiResponse;
use crate::services::{resolver, sync};
use crate::state::AppState;

const TEMPLATE_NOT_FOUND: &str = "Store template not found. Please create your store first.";

#[derive(Debug, Deserialize)]
pub struct UpsertTemplateRequest {
    pub base_template_id: Option<BaseTemplateId>,
    pub store_name: Option<String>,
    /// Absent = leave unchanged; `null` or `""` = explicit clear.
    #[serde(default, deserialize_with = "double_option")]
    pub store_subdomain: Option<Option<String>>,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PublishRequest {
    pub store_subdomain: Option<String>,
}

/// `GET /api/store-templates` - the owner's template, or `null`.
pub async fn show_own(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<Option<StoreTemplate>>>> {
    let template = StoreTemplateRepository::new(state.pool())
        .find_by_owner(owner.id)
        .await?;
    Ok(Json(ApiResponse::new(template)))
}

/// `GET /api/store-templates/subdomain/{subdomain}` - public resolution.
pub async fn show_by_subdomain(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Result<Json<ApiResponse<StoreView>>> {
    let view = resolver::resolve_store(state.pool(), state.auth(), &subdomain).await?;
    Ok(Json(ApiResponse::new(view)))
}

/// `GET /api/store-templates/{id}` - public by-id resolution.
pub async fn show_by_id(
    State(state): State<AppState>,
    Path(id): Path<StoreTemplateId>,
) -> Result<Json<ApiResponse<StoreView>>> {
    let view = resolver::resolve_store_by_id(state.pool(), state.auth(), id).await?;
    Ok(Json(ApiResponse::new(view)))
}

/// `POST /api/store-templates` - create or update the owner's template, then
/// mirror the identity fields into settings.
pub async fn upsert(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<UpsertTemplateRequest>,
) -> Result<Json<ApiResponse<StoreTemplate>>> {
    let subdomain_patch = normalize_subdomain(body.store_subdomain)?;
    let supplied_subdomain = subdomain_patch.clone().flatten();

    let repo = StoreTemplateRepository::new(state.pool());
    let template = match repo.find_by_owner(owner.id).await? {
        Some(existing) => {
            let patch = StoreTemplatePatch {
                base_template_id: body.base_template_id,
                settings_id: None,
                store_name: body.store_name.clone(),
                store_subdomain: subdomain_patch,
                theme_part: body.theme_part,
                header_part: body.header_part,
                section_part: body.section_part,
                footer_part: body.footer_part,
            };
            repo.update(existing.id, &patch).await?
        }
        None => {
            repo.create(
                owner.id,
                NewStoreTemplate {
                    base_template_id: body.base_template_id,
                    settings_id: None,
                    store_name: body.store_name.clone(),
                    store_subdomain: supplied_subdomain.clone(),
                    theme_part: body.theme_part,
                    header_part: body.header_part,
                    section_part: body.section_part,
                    footer_part: body.footer_part,
                },
            )
            .await?
        }
    };

    sync::sync_after_template_write(
        state.pool(),
        state.auth(),
        &template,
        body.store_name.as_deref(),
        supplied_subdomain.as_deref(),
    )
    .await;

    Ok(Json(ApiResponse::with_message(
        template,
        "Store template saved",
    )))
}

/// `PUT /api/store-templates/publish` - publish, optionally overriding the
/// subdomain. Republishing with the same subdomain is idempotent.
pub async fn publish(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    body: Option<Json<PublishRequest>>,
) -> Result<Json<ApiResponse<StoreTemplate>>> {
    let Json(body) = body.unwrap_or_default();
    let supplied = match body.store_subdomain.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_subdomain(raw)?),
        _ => None,
    };

    let repo = StoreTemplateRepository::new(state.pool());
    let template = repo
        .find_by_owner(owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(TEMPLATE_NOT_FOUND.to_owned()))?;

    if supplied.is_none() && template.store_subdomain.is_none() {
        return Err(AppError::Validation(
            "A subdomain is required to publish your store".to_owned(),
        ));
    }

    let published = repo.publish(template.id, supplied.as_deref()).await?;

    // Keep settings.store_url pointing at the live subdomain.
    sync::sync_after_template_write(
        state.pool(),
        state.auth(),
        &published,
        None,
        published.store_subdomain.as_deref(),
    )
    .await;

    Ok(Json(ApiResponse::with_message(
        published,
        "Store published successfully!",
    )))
}

/// `PUT /api/store-templates/unpublish` - take the store offline. The
/// subdomain stays on the row so a republish brings the same URL back.
pub async fn unpublish(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<StoreTemplate>>> {
    let template = StoreTemplateRepository::new(state.pool())
        .unpublish_for_owner(owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(TEMPLATE_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::with_message(template, "Store unpublished")))
}

/// `DELETE /api/store-templates`.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = StoreTemplateRepository::new(state.pool())
        .delete_by_owner(owner.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(TEMPLATE_NOT_FOUND.to_owned()));
    }
    Ok(Json(ApiResponse::with_message(
        (),
        "Store template deleted",
    )))
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`); plain `#[serde(default)]` collapses both to `None`.
fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Normalize the request's subdomain field into a repository patch value.
///
/// Absent stays absent; `null` and blank strings are an explicit clear; a
/// value must parse as a valid subdomain.
fn normalize_subdomain(field: Option<Option<String>>) -> Result<Option<Option<String>>> {
    match field {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(Some(None))
            } else {
                Ok(Some(Some(parse_subdomain(trimmed)?)))
            }
        }
    }
}

fn parse_subdomain(raw: &str) -> Result<String> {
    Subdomain::parse(raw)
        .map(|sub| sub.as_str().to_owned())
        .map_err(|err| AppError::Validation(format!("Invalid subdomain: {err}")))
}

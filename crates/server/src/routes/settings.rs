//! Owner settings routes.
//!
//! Every write here triggers the settings-to-template sync exactly once,
//! carrying only the fields the request actually supplied.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use shoplark_core::SettingsId;

use crate::db::{NewSettings, SettingsPatch, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::Settings;
use crate::routes::ApiResponse;
use crate::services::sync::{self, SettingsWrite};
use crate::state::AppState;

const SETTINGS_NOT_FOUND: &str = "Settings not found";

#[derive(Debug, Deserialize)]
pub struct CreateSettingsRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: Option<String>,
    pub store_name: String,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    pub payment_method_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub store_name: Option<String>,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    pub payment_method_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoreInfoRequest {
    pub store_name: String,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    pub payment_method_image: Option<String>,
}

/// `GET /api/settings` - all settings rows for the owner, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<Vec<Settings>>>> {
    let rows = SettingsRepository::new(state.pool())
        .list_for_owner(owner.id)
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// `GET /api/settings/{id}` - one settings row, owner-scoped.
pub async fn show(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<SettingsId>,
) -> Result<Json<ApiResponse<Settings>>> {
    let row = SettingsRepository::new(state.pool())
        .find_by_id_for_owner(id, owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(SETTINGS_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `POST /api/settings` - create a settings row.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<CreateSettingsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Settings>>)> {
    if body.first_name.trim().is_empty()
        || body.last_name.trim().is_empty()
        || body.email_address.trim().is_empty()
        || body.store_name.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Missing required fields: first_name, last_name, email_address, store_name".to_owned(),
        ));
    }

    let write = SettingsWrite {
        store_name: Some(body.store_name.clone()),
        store_description: body.store_description.clone(),
        store_url: body.store_url.clone(),
        payment_method_image: body.payment_method_image.clone(),
    };

    let row = SettingsRepository::new(state.pool())
        .create(
            owner.id,
            NewSettings {
                first_name: body.first_name,
                last_name: body.last_name,
                email_address: body.email_address,
                phone_number: body.phone_number,
                store_name: body.store_name,
                store_description: body.store_description,
                store_url: body.store_url,
                payment_method_image: body.payment_method_image,
            },
        )
        .await?;

    sync::sync_after_settings_write(state.pool(), owner.id, row.id, &write).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            row,
            "Settings created successfully",
        )),
    ))
}

/// `PUT /api/settings/store` - update the store-facing fields on the owner's
/// latest settings row, creating one if none exists yet.
pub async fn update_store_info(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<UpdateStoreInfoRequest>,
) -> Result<Json<ApiResponse<Settings>>> {
    if body.store_name.trim().is_empty() {
        return Err(AppError::Validation("store_name is required".to_owned()));
    }

    let write = SettingsWrite {
        store_name: Some(body.store_name.clone()),
        store_description: body.store_description.clone(),
        store_url: body.store_url.clone(),
        payment_method_image: body.payment_method_image.clone(),
    };

    let repo = SettingsRepository::new(state.pool());
    let row = match repo.latest_for_owner(owner.id).await? {
        Some(existing) => {
            let patch = SettingsPatch {
                store_name: Some(body.store_name),
                store_description: body.store_description,
                store_url: body.store_url,
                payment_method_image: body.payment_method_image,
                ..SettingsPatch::default()
            };
            repo.update(existing.id, owner.id, &patch)
                .await?
                .ok_or_else(|| AppError::NotFound(SETTINGS_NOT_FOUND.to_owned()))?
        }
        None => {
            // First store write from the builder; seed a row with the
            // account email so later email-based lookups can find it.
            let email = owner
                .email
                .clone()
                .unwrap_or_else(|| format!("{}@owners.invalid", owner.id));
            repo.create(
                owner.id,
                NewSettings {
                    first_name: "Store".to_owned(),
                    last_name: "Owner".to_owned(),
                    email_address: email,
                    phone_number: None,
                    store_name: body.store_name,
                    store_description: body.store_description,
                    store_url: body.store_url,
                    payment_method_image: body.payment_method_image,
                },
            )
            .await?
        }
    };

    sync::sync_after_settings_write(state.pool(), owner.id, row.id, &write).await;

    Ok(Json(ApiResponse::with_message(
        row,
        "Store information updated successfully and synced with template",
    )))
}

/// `PUT /api/settings/{id}` - partial update.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<SettingsId>,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<Settings>>> {
    let write = SettingsWrite {
        store_name: body.store_name.clone(),
        store_description: body.store_description.clone(),
        store_url: body.store_url.clone(),
        payment_method_image: body.payment_method_image.clone(),
    };

    let patch = SettingsPatch {
        first_name: body.first_name,
        last_name: body.last_name,
        email_address: body.email_address,
        phone_number: body.phone_number,
        store_name: body.store_name,
        store_description: body.store_description,
        store_url: body.store_url,
        payment_method_image: body.payment_method_image,
    };

    let row = SettingsRepository::new(state.pool())
        .update(id, owner.id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(SETTINGS_NOT_FOUND.to_owned()))?;

    sync::sync_after_settings_write(state.pool(), owner.id, row.id, &write).await;

    Ok(Json(ApiResponse::with_message(
        row,
        "Settings updated successfully",
    )))
}

/// `DELETE /api/settings/{id}`.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<SettingsId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = SettingsRepository::new(state.pool())
        .delete(id, owner.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(SETTINGS_NOT_FOUND.to_owned()));
    }
    Ok(Json(ApiResponse::with_message(
        (),
        "Settings deleted successfully",
    )))
}

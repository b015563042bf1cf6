//! Storage proxy routes.
//!
//! Uploads go through the server so the storage service key never reaches a
//! browser; the response carries the public URL to store on a settings or
//! template row.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::routes::ApiResponse;
use crate::services::storage::{StorageError, StoredImage};
use crate::state::AppState;

/// `POST /api/storage/upload-image` - multipart upload, `image` field.
pub async fn upload_image(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<StoredImage>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(format!("Invalid multipart body: {err}")))?
    {
        if field.file_name().is_none() {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::Validation(format!("Failed to read upload: {err}")))?;

        let stored = state
            .storage()
            .upload_image(&original_name, &content_type, data)
            .await?;

        tracing::info!(
            owner = %owner.id,
            object = %stored.name,
            "Image uploaded"
        );
        return Ok((StatusCode::CREATED, Json(ApiResponse::new(stored))));
    }

    Err(AppError::Storage(StorageError::MissingFile))
}

/// `GET /api/storage/images` - list uploaded images with public URLs.
pub async fn list_images(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
) -> Result<Json<ApiResponse<Vec<StoredImage>>>> {
    let images = state.storage().list_images().await?;
    Ok(Json(ApiResponse::new(images)))
}

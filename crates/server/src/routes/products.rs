//! Product routes (owner-scoped CRUD plus public listing and dashboard
//! summary).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use shoplark_core::ProductId;

use crate::db::{
    NewProduct, ProductPatch, ProductRepository, StoreTemplateRepository,
    products::ProductSummary,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::{Product, ProductStatus};
use crate::routes::ApiResponse;
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product not found";
const STORE_NOT_FOUND: &str = "Store not found";

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_price: Decimal,
    pub product_category: Option<String>,
    pub product_status: Option<String>,
    pub product_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_price: Option<Decimal>,
    pub product_category: Option<String>,
    pub product_status: Option<String>,
    pub product_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PublicProductsQuery {
    pub subdomain: String,
}

/// `GET /api/products`.
pub async fn list(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let rows = ProductRepository::new(state.pool())
        .list_for_owner(owner.id)
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// `GET /api/products/public?subdomain={sub}` - active products for a
/// published store. No auth; the subdomain scopes the listing.
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<PublicProductsQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let template = StoreTemplateRepository::new(state.pool())
        .find_published_by_subdomain(query.subdomain.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(STORE_NOT_FOUND.to_owned()))?;

    let rows = ProductRepository::new(state.pool())
        .list_active_for_owner(template.user_id)
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// `GET /api/products/summary` - dashboard aggregates.
pub async fn summary(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<ProductSummary>>> {
    let stats = ProductRepository::new(state.pool())
        .summary_for_owner(owner.id)
        .await?;
    Ok(Json(ApiResponse::new(stats)))
}

/// `GET /api/products/{id}`.
pub async fn show(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<Product>>> {
    let row = ProductRepository::new(state.pool())
        .find_by_id(id, owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `POST /api/products`.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    if body.product_name.trim().is_empty() {
        return Err(AppError::Validation("product_name is required".to_owned()));
    }
    if body.product_price < Decimal::ZERO {
        return Err(AppError::Validation(
            "product_price cannot be negative".to_owned(),
        ));
    }
    let status = match body.product_status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => ProductStatus::Active,
    };

    let row = ProductRepository::new(state.pool())
        .create(
            owner.id,
            NewProduct {
                product_name: body.product_name,
                product_description: body.product_description,
                product_price: body.product_price,
                product_category: body.product_category,
                product_status: status.as_str().to_owned(),
                product_image: body.product_image,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(row))))
}

/// `PUT /api/products/{id}`.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>> {
    if let Some(price) = body.product_price
        && price < Decimal::ZERO
    {
        return Err(AppError::Validation(
            "product_price cannot be negative".to_owned(),
        ));
    }
    let product_status = body
        .product_status
        .as_deref()
        .map(parse_status)
        .transpose()?
        .map(|status| status.as_str().to_owned());

    let patch = ProductPatch {
        product_name: body.product_name,
        product_description: body.product_description,
        product_price: body.product_price,
        product_category: body.product_category,
        product_status,
        product_image: body.product_image,
    };
    let row = ProductRepository::new(state.pool())
        .update(id, owner.id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `DELETE /api/products/{id}`.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = ProductRepository::new(state.pool())
        .delete(id, owner.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()));
    }
    Ok(Json(ApiResponse::with_message((), "Product deleted")))
}

fn parse_status(raw: &str) -> Result<ProductStatus> {
    ProductStatus::parse(raw).ok_or_else(|| {
        AppError::Validation(
            "product_status must be one of: active, inactive, out_of_stock".to_owned(),
        )
    })
}

//! Customer routes (owner-scoped CRUD).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use shoplark_core::{CustomerId, Email};

use crate::db::{CustomerPatch, CustomerRepository, NewCustomer};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::Customer;
use crate::routes::ApiResponse;
use crate::state::AppState;

const CUSTOMER_NOT_FOUND: &str = "Customer not found";

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_location: Option<String>,
}

/// `GET /api/customers`.
pub async fn list(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<Vec<Customer>>>> {
    let rows = CustomerRepository::new(state.pool())
        .list_for_owner(owner.id)
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// `GET /api/customers/{id}`.
pub async fn show(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<CustomerId>,
) -> Result<Json<ApiResponse<Customer>>> {
    let row = CustomerRepository::new(state.pool())
        .find_by_id(id, owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `POST /api/customers`.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>)> {
    if body.customer_name.trim().is_empty() {
        return Err(AppError::Validation("customer_name is required".to_owned()));
    }
    let email = parse_email(&body.customer_email)?;

    let row = CustomerRepository::new(state.pool())
        .create(
            owner.id,
            NewCustomer {
                customer_name: body.customer_name,
                customer_email: email,
                customer_phone: body.customer_phone,
                customer_location: body.customer_location,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(row))))
}

/// `PUT /api/customers/{id}`.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<CustomerId>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>> {
    let customer_email = body
        .customer_email
        .as_deref()
        .map(parse_email)
        .transpose()?;

    let patch = CustomerPatch {
        customer_name: body.customer_name,
        customer_email,
        customer_phone: body.customer_phone,
        customer_location: body.customer_location,
    };
    let row = CustomerRepository::new(state.pool())
        .update(id, owner.id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `DELETE /api/customers/{id}`.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<CustomerId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = CustomerRepository::new(state.pool())
        .delete(id, owner.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(CUSTOMER_NOT_FOUND.to_owned()));
    }
    Ok(Json(ApiResponse::with_message((), "Customer deleted")))
}

/// Validate and normalize a customer email.
fn parse_email(raw: &str) -> Result<String> {
    Email::parse(raw)
        .map(|email| email.as_str().to_owned())
        .map_err(|err| AppError::Validation(format!("Invalid customer_email: {err}")))
}

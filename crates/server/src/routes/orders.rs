//! Order routes (owner-scoped CRUD).
//!
//! Orders carry a human-readable `ORD-` identifier alongside the database
//! key, and client-supplied line items are sanitized before they are stored.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use shoplark_core::{CustomerId, OrderId};

use crate::db::{CustomerRepository, NewOrder, OrderPatch, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::{Order, sanitize_order_items};
use crate::routes::ApiResponse;
use crate::state::AppState;

const ORDER_NOT_FOUND: &str = "Order not found";
const CUSTOMER_NOT_FOUND: &str = "Customer not found";

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub total_price: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
    pub order_items: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<CustomerId>,
    pub total_price: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
    pub order_items: Option<JsonValue>,
}

/// `GET /api/orders`.
pub async fn list(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let rows = OrderRepository::new(state.pool())
        .list_for_owner(owner.id)
        .await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// `GET /api/orders/{id}`.
pub async fn show(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<Order>>> {
    let row = OrderRepository::new(state.pool())
        .find_by_id(id, owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `POST /api/orders`.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    // The order must belong to one of the seller's own customers.
    CustomerRepository::new(state.pool())
        .find_by_id(body.customer_id, owner.id)
        .await?
        .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_owned()))?;

    let order_items = sanitize_order_items(body.order_items.as_ref());
    let total_price = body
        .total_price
        .unwrap_or_else(|| items_total(&order_items));

    let row = OrderRepository::new(state.pool())
        .create(
            owner.id,
            NewOrder {
                order_id: generate_order_id(),
                customer_id: body.customer_id,
                total_price,
                date: body.date,
                order_items,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(row))))
}

/// `PUT /api/orders/{id}`.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    if let Some(customer_id) = body.customer_id {
        CustomerRepository::new(state.pool())
            .find_by_id(customer_id, owner.id)
            .await?
            .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_owned()))?;
    }

    let patch = OrderPatch {
        customer_id: body.customer_id,
        total_price: body.total_price,
        date: body.date,
        order_items: body.order_items.as_ref().map(|items| sanitize_order_items(Some(items))),
    };
    let row = OrderRepository::new(state.pool())
        .update(id, owner.id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.to_owned()))?;
    Ok(Json(ApiResponse::new(row)))
}

/// `DELETE /api/orders/{id}`.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = OrderRepository::new(state.pool()).delete(id, owner.id).await?;
    if !deleted {
        return Err(AppError::NotFound(ORDER_NOT_FOUND.to_owned()));
    }
    Ok(Json(ApiResponse::with_message((), "Order deleted")))
}

/// `ORD-<millis>-<6 random uppercase alphanumerics>`.
fn generate_order_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("ORD-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Sum of the sanitized line totals.
fn items_total(items: &JsonValue) -> Decimal {
    let Some(items) = items.as_array() else {
        return Decimal::ZERO;
    };
    let total: f64 = items
        .iter()
        .filter_map(|item| item.get("total").and_then(JsonValue::as_f64))
        .sum();
    Decimal::from_f64_retain(total)
        .unwrap_or_default()
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_id_shape() {
        let id = generate_order_id();
        assert!(id.starts_with("ORD-"), "got {id}");
        let suffix = id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_items_total_sums_line_totals() {
        let items = sanitize_order_items(Some(&json!([
            {"quantity": 2, "price": 3.5},
            {"quantity": 1, "price": 1.0},
        ])));
        assert_eq!(items_total(&items), Decimal::new(800, 2));
    }

    #[test]
    fn test_items_total_empty() {
        assert_eq!(items_total(&json!([])), Decimal::ZERO);
    }
}

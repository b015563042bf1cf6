//! Order model and order item sanitization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use shoplark_core::{CustomerId, OrderId, OwnerId};

/// A seller's order.
///
/// `order_id` is the human-readable identifier shown to sellers
/// (`ORD-<millis>-<RAND>`); `id` is the database key.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: OwnerId,
    pub order_id: String,
    pub customer_id: CustomerId,
    pub total_price: Decimal,
    pub date: DateTime<Utc>,
    pub order_items: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Coerce client-supplied order items into a predictable shape.
///
/// Non-array input becomes an empty list. Each item is reduced to the known
/// fields; quantity defaults to 1, price to 0, and the line total is derived
/// from quantity * price when not supplied as a number.
#[must_use]
pub fn sanitize_order_items(items: Option<&JsonValue>) -> JsonValue {
    let Some(JsonValue::Array(items)) = items else {
        return json!([]);
    };

    let sanitized: Vec<JsonValue> = items
        .iter()
        .map(|item| {
            let quantity = item
                .get("quantity")
                .and_then(JsonValue::as_i64)
                .filter(|q| *q >= 0)
                .unwrap_or(1);
            let price = number_field(item, "price").unwrap_or(0.0);
            #[allow(clippy::cast_precision_loss)]
            let total = number_field(item, "total").unwrap_or(quantity as f64 * price);

            json!({
                "product_id": item.get("product_id").cloned().unwrap_or(JsonValue::Null),
                "product_name": item.get("product_name").cloned().unwrap_or(JsonValue::Null),
                "product_sku": item.get("product_sku").cloned().unwrap_or(JsonValue::Null),
                "quantity": quantity,
                "price": price,
                "total": total,
            })
        })
        .collect();

    JsonValue::Array(sanitized)
}

/// Read a numeric field that may arrive as a JSON number or a numeric string.
fn number_field(item: &JsonValue, key: &str) -> Option<f64> {
    match item.get(key)? {
        JsonValue::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_non_array_becomes_empty() {
        assert_eq!(sanitize_order_items(None), json!([]));
        assert_eq!(sanitize_order_items(Some(&json!({"a": 1}))), json!([]));
        assert_eq!(sanitize_order_items(Some(&json!("nope"))), json!([]));
    }

    #[test]
    fn test_sanitize_fills_defaults() {
        let items = json!([{}]);
        let out = sanitize_order_items(Some(&items));
        let first = out.get(0).unwrap();
        assert_eq!(first.get("quantity").unwrap(), 1);
        assert!((first.get("price").unwrap().as_f64().unwrap() - 0.0).abs() < f64::EPSILON);
        assert!((first.get("total").unwrap().as_f64().unwrap() - 0.0).abs() < f64::EPSILON);
        assert_eq!(first.get("product_id").unwrap(), &JsonValue::Null);
    }

    #[test]
    fn test_sanitize_derives_total() {
        let items = json!([{"product_name": "Mug", "quantity": 3, "price": "2.50"}]);
        let out = sanitize_order_items(Some(&items));
        let first = out.get(0).unwrap();
        assert!((first.get("total").unwrap().as_f64().unwrap() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sanitize_keeps_explicit_total() {
        let items = json!([{"quantity": 2, "price": 5, "total": 9.0}]);
        let out = sanitize_order_items(Some(&items));
        let first = out.get(0).unwrap();
        assert!((first.get("total").unwrap().as_f64().unwrap() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sanitize_drops_unknown_fields() {
        let items = json!([{"product_name": "Mug", "evil": true}]);
        let out = sanitize_order_items(Some(&items));
        assert!(out.get(0).unwrap().get("evil").is_none());
    }
}

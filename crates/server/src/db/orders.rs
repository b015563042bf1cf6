//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, QueryBuilder};

use shoplark_core::{CustomerId, OrderId, OwnerId};

use super::RepositoryError;
use crate::models::Order;

/// Fields for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub customer_id: CustomerId,
    pub total_price: Decimal,
    pub date: Option<DateTime<Utc>>,
    pub order_items: JsonValue,
}

/// Partial update of an order. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_id: Option<CustomerId>,
    pub total_price: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
    pub order_items: Option<JsonValue>,
}

/// Repository for seller-owned orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The seller's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY date DESC",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Look up one of the seller's orders by database id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: OrderId,
        owner: OwnerId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row =
            sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    /// Insert a new order for the seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, owner: OwnerId, new: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (user_id, order_id, customer_id, total_price, date, order_items)
            VALUES ($1, $2, $3, $4, COALESCE($5, now()), $6)
            RETURNING *
            ",
        )
        .bind(owner)
        .bind(new.order_id)
        .bind(new.customer_id)
        .bind(new.total_price)
        .bind(new.date)
        .bind(new.order_items)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a partial update to one of the seller's orders.
    ///
    /// Returns `None` if the order does not exist or belongs to another
    /// seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: OrderId,
        owner: OwnerId,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut qb = QueryBuilder::new("UPDATE orders SET updated_at = now()");
        if let Some(customer_id) = patch.customer_id {
            qb.push(", customer_id = ").push_bind(customer_id);
        }
        if let Some(total) = patch.total_price {
            qb.push(", total_price = ").push_bind(total);
        }
        if let Some(date) = patch.date {
            qb.push(", date = ").push_bind(date);
        }
        if let Some(items) = &patch.order_items {
            qb.push(", order_items = ").push_bind(items);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(owner)
            .push(" RETURNING *");

        let row = qb
            .build_query_as::<Order>()
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Delete one of the seller's orders.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId, owner: OwnerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

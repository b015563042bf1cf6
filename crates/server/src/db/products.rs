//! Product repository.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, QueryBuilder};

use shoplark_core::{OwnerId, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_price: Decimal,
    pub product_category: Option<String>,
    pub product_status: String,
    pub product_image: Option<String>,
}

/// Partial update of a product. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_price: Option<Decimal>,
    pub product_category: Option<String>,
    pub product_status: Option<String>,
    pub product_image: Option<String>,
}

/// Dashboard aggregate over a seller's catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub total_products: i64,
    pub active_products: i64,
    pub inactive_products: i64,
    pub out_of_stock_products: i64,
    pub total_value: Decimal,
    pub average_price: Decimal,
}

#[derive(sqlx::FromRow)]
struct ProductSummaryRow {
    total: i64,
    active: i64,
    inactive: i64,
    out_of_stock: i64,
    total_value: Decimal,
    average_price: Decimal,
}

/// Repository for seller-owned products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The seller's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Active products for a published store's public pages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(
            r"
            SELECT * FROM products
            WHERE user_id = $1 AND product_status = 'active'
            ORDER BY created_at DESC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Dashboard summary statistics for the seller's catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<ProductSummary, RepositoryError> {
        let row = sqlx::query_as::<_, ProductSummaryRow>(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE product_status = 'active') AS active,
                   COUNT(*) FILTER (WHERE product_status = 'inactive') AS inactive,
                   COUNT(*) FILTER (WHERE product_status = 'out_of_stock') AS out_of_stock,
                   COALESCE(SUM(product_price), 0) AS total_value,
                   COALESCE(AVG(product_price), 0) AS average_price
            FROM products
            WHERE user_id = $1
            ",
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(ProductSummary {
            total_products: row.total,
            active_products: row.active,
            inactive_products: row.inactive,
            out_of_stock_products: row.out_of_stock,
            total_value: row.total_value.round_dp(2),
            average_price: row.average_price.round_dp(2),
        })
    }

    /// Look up one of the seller's products by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: ProductId,
        owner: OwnerId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    /// Insert a new product for the seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        owner: OwnerId,
        new: NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (user_id, product_name, product_description, product_price,
                                  product_category, product_status, product_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(owner)
        .bind(new.product_name)
        .bind(new.product_description)
        .bind(new.product_price)
        .bind(new.product_category)
        .bind(new.product_status)
        .bind(new.product_image)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a partial update to one of the seller's products.
    ///
    /// Returns `None` if the product does not exist or belongs to another
    /// seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        owner: OwnerId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut qb = QueryBuilder::new("UPDATE products SET updated_at = now()");
        if let Some(name) = &patch.product_name {
            qb.push(", product_name = ").push_bind(name);
        }
        if let Some(description) = &patch.product_description {
            qb.push(", product_description = ").push_bind(description);
        }
        if let Some(price) = patch.product_price {
            qb.push(", product_price = ").push_bind(price);
        }
        if let Some(category) = &patch.product_category {
            qb.push(", product_category = ").push_bind(category);
        }
        if let Some(status) = &patch.product_status {
            qb.push(", product_status = ").push_bind(status);
        }
        if let Some(image) = &patch.product_image {
            qb.push(", product_image = ").push_bind(image);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(owner)
            .push(" RETURNING *");

        let row = qb
            .build_query_as::<Product>()
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Delete one of the seller's products.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId, owner: OwnerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

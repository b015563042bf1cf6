//! Payment image log repository.
//!
//! The `payment_images` table is an append-only log: each upload inserts a
//! new active row and deactivates previous actives for the same template in
//! the same transaction, so at most one row is active per template.

use sqlx::PgPool;

use shoplark_core::StoreTemplateId;

use super::RepositoryError;

/// Repository for the payment-display asset log.
pub struct PaymentImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentImageRepository<'a> {
    /// Create a new payment image repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a new active row, deactivating prior actives for the template.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails; the
    /// transaction rolls back as a unit.
    pub async fn record_active(
        &self,
        template_id: StoreTemplateId,
        image_url: &str,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE payment_images SET is_active = false WHERE store_template_id = $1 AND is_active",
        )
        .bind(template_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO payment_images (store_template_id, image_url, is_active) VALUES ($1, $2, true)",
        )
        .bind(template_id)
        .bind(image_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// The most recent active image URL for a template, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_active_url(
        &self,
        template_id: StoreTemplateId,
    ) -> Result<Option<String>, RepositoryError> {
        let url = sqlx::query_scalar::<_, String>(
            r"
            SELECT image_url FROM payment_images
            WHERE store_template_id = $1 AND is_active
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(template_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(url)
    }
}

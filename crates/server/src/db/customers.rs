//! Customer repository.

use sqlx::{PgPool, QueryBuilder};

use shoplark_core::{CustomerId, OwnerId};

use super::RepositoryError;
use crate::models::Customer;

const EMAIL_CONFLICT: &str = "Customer with this email already exists";

/// Fields for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_location: Option<String>,
}

/// Partial update of a customer. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_location: Option<String>,
}

/// Repository for seller-owned customers.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The seller's customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Look up one of the seller's customers by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: CustomerId,
        owner: OwnerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE customer_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a new customer for the seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken for
    /// this seller. Returns `RepositoryError::Database` for other errors.
    pub async fn create(
        &self,
        owner: OwnerId,
        new: NewCustomer,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, Customer>(
            r"
            INSERT INTO customers (user_id, customer_name, customer_email, customer_phone, customer_location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(owner)
        .bind(new.customer_name)
        .bind(new.customer_email)
        .bind(new.customer_phone)
        .bind(new.customer_location)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, EMAIL_CONFLICT))?;
        Ok(row)
    }

    /// Apply a partial update to one of the seller's customers.
    ///
    /// Returns `None` if the customer does not exist or belongs to another
    /// seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on duplicate email.
    /// Returns `RepositoryError::Database` for other errors.
    pub async fn update(
        &self,
        id: CustomerId,
        owner: OwnerId,
        patch: &CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut qb = QueryBuilder::new("UPDATE customers SET updated_at = now()");
        if let Some(name) = &patch.customer_name {
            qb.push(", customer_name = ").push_bind(name);
        }
        if let Some(email) = &patch.customer_email {
            qb.push(", customer_email = ").push_bind(email);
        }
        if let Some(phone) = &patch.customer_phone {
            qb.push(", customer_phone = ").push_bind(phone);
        }
        if let Some(location) = &patch.customer_location {
            qb.push(", customer_location = ").push_bind(location);
        }
        qb.push(" WHERE customer_id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(owner)
            .push(" RETURNING *");

        let row = qb
            .build_query_as::<Customer>()
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, EMAIL_CONFLICT))?;
        Ok(row)
    }

    /// Delete one of the seller's customers.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CustomerId, owner: OwnerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

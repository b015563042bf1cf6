//! Settings repository.

use sqlx::{PgPool, QueryBuilder};

use shoplark_core::{OwnerId, SettingsId};

use super::RepositoryError;
use crate::models::Settings;

/// Fields for creating a settings row.
#[derive(Debug, Clone)]
pub struct NewSettings {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: Option<String>,
    pub store_name: String,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    pub payment_method_image: Option<String>,
}

/// Partial update of a settings row. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub store_name: Option<String>,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    pub payment_method_image: Option<String>,
}

impl SettingsPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email_address.is_none()
            && self.phone_number.is_none()
            && self.store_name.is_none()
            && self.store_description.is_none()
            && self.store_url.is_none()
            && self.payment_method_image.is_none()
    }
}

const EMAIL_CONFLICT: &str = "Settings with this email already exists";

/// Repository for owner settings rows.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All of the owner's settings rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<Settings>, RepositoryError> {
        let rows = sqlx::query_as::<_, Settings>(
            "SELECT * FROM settings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// The owner's most recent settings row, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Option<Settings>, RepositoryError> {
        let row = sqlx::query_as::<_, Settings>(
            "SELECT * FROM settings WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Look up a settings row by id, regardless of owner.
    ///
    /// Used by the resolver when following a template's `settings_id` link;
    /// owner-facing routes should use [`Self::find_by_id_for_owner`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: SettingsId) -> Result<Option<Settings>, RepositoryError> {
        let row = sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Look up a settings row by id, scoped to the owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id_for_owner(
        &self,
        id: SettingsId,
        owner: OwnerId,
    ) -> Result<Option<Settings>, RepositoryError> {
        let row =
            sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    /// The most recently created settings row with the given contact email.
    ///
    /// This is the resolver's last-resort lookup when a template has no
    /// `settings_id` link; the match is a soft relationship by email string.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Settings>, RepositoryError> {
        let row = sqlx::query_as::<_, Settings>(
            "SELECT * FROM settings WHERE email_address = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a new settings row for the owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        owner: OwnerId,
        new: NewSettings,
    ) -> Result<Settings, RepositoryError> {
        let row = sqlx::query_as::<_, Settings>(
            r"
            INSERT INTO settings (user_id, first_name, last_name, email_address, phone_number,
                                  store_name, store_description, store_url, payment_method_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            ",
        )
        .bind(owner)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.email_address)
        .bind(new.phone_number)
        .bind(new.store_name)
        .bind(new.store_description)
        .bind(new.store_url)
        .bind(new.payment_method_image)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, EMAIL_CONFLICT))?;
        Ok(row)
    }

    /// Apply a partial update to an owner's settings row.
    ///
    /// Returns `None` if the row does not exist or belongs to another owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: SettingsId,
        owner: OwnerId,
        patch: &SettingsPatch,
    ) -> Result<Option<Settings>, RepositoryError> {
        if patch.is_empty() {
            return self.find_by_id_for_owner(id, owner).await;
        }

        let mut qb = QueryBuilder::new("UPDATE settings SET updated_at = now()");
        push_set(&mut qb, "first_name", patch.first_name.as_deref());
        push_set(&mut qb, "last_name", patch.last_name.as_deref());
        push_set(&mut qb, "email_address", patch.email_address.as_deref());
        push_set(&mut qb, "phone_number", patch.phone_number.as_deref());
        push_set(&mut qb, "store_name", patch.store_name.as_deref());
        push_set(&mut qb, "store_description", patch.store_description.as_deref());
        push_set(&mut qb, "store_url", patch.store_url.as_deref());
        push_set(
            &mut qb,
            "payment_method_image",
            patch.payment_method_image.as_deref(),
        );
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(owner)
            .push(" RETURNING *");

        let row = qb
            .build_query_as::<Settings>()
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, EMAIL_CONFLICT))?;
        Ok(row)
    }

    /// Mirror store identity fields from a template write (symmetric sync).
    ///
    /// Only the supplied fields are touched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_store_identity(
        &self,
        id: SettingsId,
        store_name: Option<&str>,
        store_url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        if store_name.is_none() && store_url.is_none() {
            return Ok(());
        }

        let mut qb = QueryBuilder::new("UPDATE settings SET updated_at = now()");
        push_set(&mut qb, "store_name", store_name);
        push_set(&mut qb, "store_url", store_url);
        qb.push(" WHERE id = ").push_bind(id);

        qb.build().execute(self.pool).await?;
        Ok(())
    }

    /// Delete an owner's settings row.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SettingsId, owner: OwnerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM settings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Append `, column = $n` for a present value.
fn push_set<'args>(
    qb: &mut QueryBuilder<'args, sqlx::Postgres>,
    column: &str,
    value: Option<&'args str>,
) {
    if let Some(value) = value {
        qb.push(format!(", {column} = ")).push_bind(value);
    }
}

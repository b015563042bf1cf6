//! Store template repository.

use serde_json::Value as JsonValue;
use sqlx::{PgPool, QueryBuilder};

use shoplark_core::{BaseTemplateId, OwnerId, SettingsId, StoreTemplateId};

use super::RepositoryError;
use crate::models::StoreTemplate;

const SUBDOMAIN_CONFLICT: &str = "This subdomain is already taken by another published store";

/// Fields for creating an owner's template row.
#[derive(Debug, Clone, Default)]
pub struct NewStoreTemplate {
    pub base_template_id: Option<BaseTemplateId>,
    pub settings_id: Option<SettingsId>,
    pub store_name: Option<String>,
    pub store_subdomain: Option<String>,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

/// Partial update of a template row.
///
/// Outer `None` means "leave unchanged". For `store_subdomain` the inner
/// option distinguishes an explicit clear (`Some(None)`) from a new value
/// (`Some(Some(_))`) - clearing a live subdomain must always be a deliberate
/// instruction, never a side effect.
#[derive(Debug, Clone, Default)]
pub struct StoreTemplatePatch {
    pub base_template_id: Option<BaseTemplateId>,
    pub settings_id: Option<SettingsId>,
    pub store_name: Option<String>,
    pub store_subdomain: Option<Option<String>>,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

/// Repository for store template rows.
pub struct StoreTemplateRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreTemplateRepository<'a> {
    /// Create a new store template repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The owner's template, if one exists (at most one per owner).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Option<StoreTemplate>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreTemplate>(
            "SELECT * FROM store_templates WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Look up a published template by its subdomain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_published_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<StoreTemplate>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreTemplate>(
            "SELECT * FROM store_templates WHERE store_subdomain = $1 AND is_published",
        )
        .bind(subdomain)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Whether an unpublished template holds this subdomain.
    ///
    /// Server-side diagnostics only; the public response never distinguishes
    /// unpublished from nonexistent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unpublished_holds_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM store_templates WHERE store_subdomain = $1 AND NOT is_published)",
        )
        .bind(subdomain)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Look up a published template by id (public by-id access).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_published_by_id(
        &self,
        id: StoreTemplateId,
    ) -> Result<Option<StoreTemplate>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreTemplate>(
            "SELECT * FROM store_templates WHERE id = $1 AND is_published",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a template row for the owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner already has a
    /// template. Returns `RepositoryError::Database` for other errors.
    pub async fn create(
        &self,
        owner: OwnerId,
        new: NewStoreTemplate,
    ) -> Result<StoreTemplate, RepositoryError> {
        let row = sqlx::query_as::<_, StoreTemplate>(
            r"
            INSERT INTO store_templates (user_id, base_template_id, settings_id, store_name,
                                         store_subdomain, theme_part, header_part, section_part,
                                         footer_part)
            VALUES ($1, $2, $3, $4, $5,
                    COALESCE($6, '{}'::jsonb), COALESCE($7, '{}'::jsonb),
                    COALESCE($8, '[]'::jsonb), COALESCE($9, '{}'::jsonb))
            RETURNING *
            ",
        )
        .bind(owner)
        .bind(new.base_template_id)
        .bind(new.settings_id)
        .bind(new.store_name)
        .bind(new.store_subdomain)
        .bind(new.theme_part)
        .bind(new.header_part)
        .bind(new.section_part)
        .bind(new.footer_part)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "Store template already exists"))?;
        Ok(row)
    }

    /// Apply a partial update to a template row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a published-subdomain clash.
    /// Returns `RepositoryError::Database` for other errors.
    pub async fn update(
        &self,
        id: StoreTemplateId,
        patch: &StoreTemplatePatch,
    ) -> Result<StoreTemplate, RepositoryError> {
        let mut qb = QueryBuilder::new("UPDATE store_templates SET updated_at = now()");

        if let Some(base) = patch.base_template_id {
            qb.push(", base_template_id = ").push_bind(base);
        }
        if let Some(settings_id) = patch.settings_id {
            qb.push(", settings_id = ").push_bind(settings_id);
        }
        if let Some(name) = &patch.store_name {
            qb.push(", store_name = ").push_bind(name);
        }
        if let Some(subdomain) = &patch.store_subdomain {
            qb.push(", store_subdomain = ");
            match subdomain {
                Some(value) => {
                    qb.push_bind(value);
                }
                None => {
                    qb.push("NULL");
                }
            }
        }
        if let Some(theme) = &patch.theme_part {
            qb.push(", theme_part = ").push_bind(theme);
        }
        if let Some(header) = &patch.header_part {
            qb.push(", header_part = ").push_bind(header);
        }
        if let Some(sections) = &patch.section_part {
            qb.push(", section_part = ").push_bind(sections);
        }
        if let Some(footer) = &patch.footer_part {
            qb.push(", footer_part = ").push_bind(footer);
        }

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb
            .build_query_as::<StoreTemplate>()
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, SUBDOMAIN_CONFLICT))?;
        Ok(row)
    }

    /// Mark a template published, optionally overriding the subdomain.
    ///
    /// Republishing with the same subdomain is idempotent aside from
    /// `published_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the subdomain is already
    /// published by another store. Returns `RepositoryError::Database`
    /// for other errors.
    pub async fn publish(
        &self,
        id: StoreTemplateId,
        subdomain: Option<&str>,
    ) -> Result<StoreTemplate, RepositoryError> {
        let row = sqlx::query_as::<_, StoreTemplate>(
            r"
            UPDATE store_templates
            SET is_published = true,
                published_at = now(),
                updated_at = now(),
                store_subdomain = COALESCE($2, store_subdomain)
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(subdomain)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, SUBDOMAIN_CONFLICT))?;
        Ok(row)
    }

    /// Take the owner's store offline.
    ///
    /// Returns `None` if the owner has no template.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unpublish_for_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Option<StoreTemplate>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreTemplate>(
            r"
            UPDATE store_templates
            SET is_published = false, published_at = NULL, updated_at = now()
            WHERE user_id = $1
            RETURNING *
            ",
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Link a template to its settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_settings_id(
        &self,
        id: StoreTemplateId,
        settings_id: SettingsId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE store_templates SET settings_id = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(settings_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Delete the owner's template.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_owner(&self, owner: OwnerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store_templates WHERE user_id = $1")
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Base template gallery repository.

use serde_json::Value as JsonValue;
use sqlx::{PgPool, QueryBuilder};

use shoplark_core::BaseTemplateId;

use super::RepositoryError;
use crate::models::BaseTemplate;

/// Fields for creating a base template.
#[derive(Debug, Clone)]
pub struct NewBaseTemplate {
    pub template_name: String,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

/// Partial update of a base template. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct BaseTemplatePatch {
    pub template_name: Option<String>,
    pub theme_part: Option<JsonValue>,
    pub header_part: Option<JsonValue>,
    pub section_part: Option<JsonValue>,
    pub footer_part: Option<JsonValue>,
}

/// Repository for the base template gallery.
pub struct BaseTemplateRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BaseTemplateRepository<'a> {
    /// Create a new base template repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All templates, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<BaseTemplate>, RepositoryError> {
        let rows = sqlx::query_as::<_, BaseTemplate>(
            "SELECT * FROM templates ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Look up a template by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: BaseTemplateId,
    ) -> Result<Option<BaseTemplate>, RepositoryError> {
        let row = sqlx::query_as::<_, BaseTemplate>("SELECT * FROM templates WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Insert a new template.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: NewBaseTemplate) -> Result<BaseTemplate, RepositoryError> {
        let row = sqlx::query_as::<_, BaseTemplate>(
            r"
            INSERT INTO templates (template_name, theme_part, header_part, section_part, footer_part)
            VALUES ($1, COALESCE($2, '{}'::jsonb), COALESCE($3, '{}'::jsonb),
                    COALESCE($4, '[]'::jsonb), COALESCE($5, '{}'::jsonb))
            RETURNING *
            ",
        )
        .bind(new.template_name)
        .bind(new.theme_part)
        .bind(new.header_part)
        .bind(new.section_part)
        .bind(new.footer_part)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a partial update.
    ///
    /// Returns `None` if the template does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: BaseTemplateId,
        patch: &BaseTemplatePatch,
    ) -> Result<Option<BaseTemplate>, RepositoryError> {
        let mut qb = QueryBuilder::new("UPDATE templates SET updated_at = now()");
        if let Some(name) = &patch.template_name {
            qb.push(", template_name = ").push_bind(name);
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
            .build_query_as::<BaseTemplate>()
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Delete a template.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BaseTemplateId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

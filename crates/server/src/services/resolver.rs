//! Published store resolution.
//!
//! Resolves a public subdomain to its published template and merges in the
//! payment-display asset. The asset comes from an ordered fallback chain:
//!
//! 1. most recent active `payment_images` row for the template;
//! 2. the settings row the template links via `settings_id`;
//! 3. the most recent settings row matching the owner's account email.
//!
//! The first usable value wins. A value is usable when it is non-empty after
//! trimming and is not the literal string `null` or `undefined` (stringified
//! empties that leak in from client-side serialization). No usable value
//! means the store renders without a payment image; that is never an error.
//!
//! Auth-service failures in strategies 2 and 3 degrade to "no value" with a
//! warning. Database failures propagate.

use sqlx::PgPool;
use tokio::sync::OnceCell;

use shoplark_core::StoreTemplateId;

use crate::db::{
    PaymentImageRepository, RepositoryError, SettingsRepository, StoreTemplateRepository,
};
use crate::error::AppError;
use crate::models::{StoreTemplate, StoreView};
use crate::services::auth::AuthClient;

/// Opaque public miss message. Absent and unpublished stores are
/// indistinguishable to callers.
const STORE_NOT_FOUND: &str = "Store not found";

/// Filter a candidate asset value down to a usable URL.
///
/// Trims whitespace and rejects empty strings and the literals
/// `null`/`undefined` (any casing).
#[must_use]
pub fn usable_asset(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("undefined")
    {
        return None;
    }
    Some(trimmed.to_owned())
}

/// The ordered asset strategies, abstracted so the fallback policy is
/// testable without a database.
#[allow(async_fn_in_trait)]
pub trait AssetSources {
    /// Strategy 1: the template's most recent active uploaded image.
    async fn active_payment_image(&self) -> Result<Option<String>, RepositoryError>;
    /// Strategy 2: the image on the settings row linked via `settings_id`.
    async fn linked_settings_image(&self) -> Result<Option<String>, RepositoryError>;
    /// Strategy 3: the image on the owner's settings row found by email.
    async fn owner_settings_image(&self) -> Result<Option<String>, RepositoryError>;
}

/// Walk the strategies in order; first usable value wins.
///
/// # Errors
///
/// Propagates database errors from any strategy.
pub async fn resolve_payment_asset<S: AssetSources>(
    sources: &S,
) -> Result<Option<String>, RepositoryError> {
    if let Some(url) = usable_asset(sources.active_payment_image().await?.as_deref()) {
        return Ok(Some(url));
    }
    if let Some(url) = usable_asset(sources.linked_settings_image().await?.as_deref()) {
        return Ok(Some(url));
    }
    if let Some(url) = usable_asset(sources.owner_settings_image().await?.as_deref()) {
        return Ok(Some(url));
    }
    Ok(None)
}

/// Database-backed [`AssetSources`] for a resolved template.
pub struct DbAssetSources<'a> {
    pool: &'a PgPool,
    auth: &'a AuthClient,
    template: &'a StoreTemplate,
    owner_email: OnceCell<Option<String>>,
}

impl<'a> DbAssetSources<'a> {
    /// Build asset sources for a template row.
    #[must_use]
    pub const fn new(pool: &'a PgPool, auth: &'a AuthClient, template: &'a StoreTemplate) -> Self {
        Self {
            pool,
            auth,
            template,
            owner_email: OnceCell::const_new(),
        }
    }

    /// The owner's account email, fetched once per resolution. Auth failures
    /// degrade to `None` with a warning.
    async fn owner_email(&self) -> Option<&str> {
        self.owner_email
            .get_or_init(|| async {
                match self.auth.get_user_by_id(self.template.user_id).await {
                    Ok(user) => user.email,
                    Err(err) => {
                        tracing::warn!(
                            owner = %self.template.user_id,
                            error = %err,
                            "Could not fetch owner account during store resolution"
                        );
                        None
                    }
                }
            })
            .await
            .as_deref()
    }
}

impl AssetSources for DbAssetSources<'_> {
    async fn active_payment_image(&self) -> Result<Option<String>, RepositoryError> {
        PaymentImageRepository::new(self.pool)
            .latest_active_url(self.template.id)
            .await
    }

    async fn linked_settings_image(&self) -> Result<Option<String>, RepositoryError> {
        let Some(settings_id) = self.template.settings_id else {
            return Ok(None);
        };
        let Some(settings) = SettingsRepository::new(self.pool)
            .find_by_id(settings_id)
            .await?
        else {
            tracing::warn!(
                template = %self.template.id,
                %settings_id,
                "Template links a settings row that no longer exists"
            );
            return Ok(None);
        };

        if let Some(owner_email) = self.owner_email().await
            && !settings.email_address.eq_ignore_ascii_case(owner_email)
        {
            tracing::warn!(
                template = %self.template.id,
                %settings_id,
                "Linked settings email does not match the owner account"
            );
        }
        Ok(settings.payment_method_image)
    }

    async fn owner_settings_image(&self) -> Result<Option<String>, RepositoryError> {
        let Some(email) = self.owner_email().await else {
            return Ok(None);
        };
        let Some(settings) = SettingsRepository::new(self.pool)
            .latest_by_email(email)
            .await?
        else {
            return Ok(None);
        };

        // Recovered the soft link; persist it so the next resolution takes
        // strategy 2. Best-effort.
        if self.template.settings_id.is_none()
            && let Err(err) = StoreTemplateRepository::new(self.pool)
                .set_settings_id(self.template.id, settings.id)
                .await
        {
            tracing::warn!(
                template = %self.template.id,
                error = %err,
                "Failed to backfill settings link during resolution"
            );
        }
        Ok(settings.payment_method_image)
    }
}

/// Resolve a published store by subdomain.
///
/// # Errors
///
/// Returns `AppError::NotFound` (opaque) when no published store holds the
/// subdomain, or a database error from the lookup or fallback chain.
pub async fn resolve_store(
    pool: &PgPool,
    auth: &AuthClient,
    subdomain: &str,
) -> Result<StoreView, AppError> {
    let repo = StoreTemplateRepository::new(pool);
    let Some(template) = repo.find_published_by_subdomain(subdomain).await? else {
        if matches!(repo.unpublished_holds_subdomain(subdomain).await, Ok(true)) {
            tracing::debug!(subdomain, "Subdomain is held by an unpublished store");
        }
        return Err(AppError::NotFound(STORE_NOT_FOUND.to_owned()));
    };
    finish_resolution(pool, auth, template).await
}

/// Resolve a published store by template id (public by-id access).
///
/// # Errors
///
/// Returns `AppError::NotFound` if the template is absent or unpublished,
/// or a database error from the lookup or fallback chain.
pub async fn resolve_store_by_id(
    pool: &PgPool,
    auth: &AuthClient,
    id: StoreTemplateId,
) -> Result<StoreView, AppError> {
    let Some(template) = StoreTemplateRepository::new(pool)
        .find_published_by_id(id)
        .await?
    else {
        return Err(AppError::NotFound(
            "Store not found or not published".to_owned(),
        ));
    };
    finish_resolution(pool, auth, template).await
}

async fn finish_resolution(
    pool: &PgPool,
    auth: &AuthClient,
    template: StoreTemplate,
) -> Result<StoreView, AppError> {
    let sources = DbAssetSources::new(pool, auth, &template);
    let payment_method_image = resolve_payment_asset(&sources).await?;
    Ok(StoreView {
        template,
        payment_method_image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSources {
        active: Option<String>,
        linked: Option<String>,
        owner: Option<String>,
    }

    impl AssetSources for FakeSources {
        async fn active_payment_image(&self) -> Result<Option<String>, RepositoryError> {
            Ok(self.active.clone())
        }

        async fn linked_settings_image(&self) -> Result<Option<String>, RepositoryError> {
            Ok(self.linked.clone())
        }

        async fn owner_settings_image(&self) -> Result<Option<String>, RepositoryError> {
            Ok(self.owner.clone())
        }
    }

    #[test]
    fn test_usable_asset_filters_stringified_empties() {
        assert_eq!(usable_asset(None), None);
        assert_eq!(usable_asset(Some("")), None);
        assert_eq!(usable_asset(Some("   ")), None);
        assert_eq!(usable_asset(Some("null")), None);
        assert_eq!(usable_asset(Some("NULL")), None);
        assert_eq!(usable_asset(Some("undefined")), None);
        assert_eq!(
            usable_asset(Some("  https://cdn.example/x.png  ")),
            Some("https://cdn.example/x.png".to_owned())
        );
    }

    #[tokio::test]
    async fn test_uploaded_image_beats_linked_settings() {
        let sources = FakeSources {
            active: Some("https://cdn.example/upload.png".to_owned()),
            linked: Some("https://cdn.example/linked.png".to_owned()),
            owner: Some("https://cdn.example/owner.png".to_owned()),
        };
        let asset = resolve_payment_asset(&sources).await.unwrap();
        assert_eq!(asset.as_deref(), Some("https://cdn.example/upload.png"));
    }

    #[tokio::test]
    async fn test_unusable_values_fall_through() {
        let sources = FakeSources {
            active: Some("null".to_owned()),
            linked: Some("   ".to_owned()),
            owner: Some("https://cdn.example/owner.png".to_owned()),
        };
        let asset = resolve_payment_asset(&sources).await.unwrap();
        assert_eq!(asset.as_deref(), Some("https://cdn.example/owner.png"));
    }

    #[tokio::test]
    async fn test_linked_settings_beats_email_match() {
        let sources = FakeSources {
            active: None,
            linked: Some("https://cdn.example/linked.png".to_owned()),
            owner: Some("https://cdn.example/owner.png".to_owned()),
        };
        let asset = resolve_payment_asset(&sources).await.unwrap();
        assert_eq!(asset.as_deref(), Some("https://cdn.example/linked.png"));
    }

    #[tokio::test]
    async fn test_no_usable_value_is_not_an_error() {
        let sources = FakeSources {
            active: None,
            linked: Some("undefined".to_owned()),
            owner: None,
        };
        let asset = resolve_payment_asset(&sources).await.unwrap();
        assert_eq!(asset, None);
    }
}

//! Settings/template synchronization.
//!
//! Settings and store templates describe the same store from two angles, so
//! writes to either side mirror the shared fields into the other. The policy
//! lives in pure *plan* functions over already-fetched state; thin async glue
//! applies the plans. Sync is best-effort: a failed mirror write is logged
//! and never fails the primary write.
//!
//! Two rules carry the whole module:
//!
//! - A populated subdomain is never cleared by an unrelated settings edit.
//!   Only an explicitly supplied value replaces it.
//! - A write that touches only `payment_method_image` must not touch the
//!   template's identity fields at all; it only links the settings row and
//!   appends to the payment image log.

use serde_json::{Map, Value as JsonValue};
use sqlx::PgPool;

use shoplark_core::{OwnerId, SettingsId, StoreTemplateId, Subdomain};

use crate::db::{
    NewSettings, NewStoreTemplate, PaymentImageRepository, SettingsRepository,
    StoreTemplatePatch, StoreTemplateRepository,
};
use crate::models::StoreTemplate;
use crate::services::auth::AuthClient;

/// Store-facing fields supplied in a settings write. `None` means the field
/// was absent from the request; absence and empty are different things.
#[derive(Debug, Clone, Default)]
pub struct SettingsWrite {
    pub store_name: Option<String>,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    pub payment_method_image: Option<String>,
}

/// Classification of a settings write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// No store-facing fields at all.
    NoStoreFields,
    /// Only `payment_method_image` was supplied.
    PaymentAssetOnly,
    /// At least one of name/description/url was supplied.
    StoreIdentity,
}

/// Classify a settings write by which store-facing fields are present.
#[must_use]
pub const fn classify(write: &SettingsWrite) -> WriteKind {
    let identity = write.store_name.is_some()
        || write.store_description.is_some()
        || write.store_url.is_some();
    if identity {
        WriteKind::StoreIdentity
    } else if write.payment_method_image.is_some() {
        WriteKind::PaymentAssetOnly
    } else {
        WriteKind::NoStoreFields
    }
}

/// The template state a settings-write plan is computed against.
#[derive(Debug, Clone)]
pub struct TemplateSyncState {
    pub store_subdomain: Option<String>,
    pub header_part: JsonValue,
}

impl From<&StoreTemplate> for TemplateSyncState {
    fn from(template: &StoreTemplate) -> Self {
        Self {
            store_subdomain: template.store_subdomain.clone(),
            header_part: template.header_part.clone(),
        }
    }
}

/// What to do to the owner's template after a settings write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSyncPlan {
    /// Touch nothing.
    Nothing,
    /// Link the settings row and append the payment image; identity fields
    /// stay untouched.
    AssetOnly,
    /// Update the existing template.
    Update {
        store_name: Option<String>,
        store_subdomain: Option<String>,
        header_part: JsonValue,
        record_image: bool,
    },
    /// No template yet; create one from the supplied fields.
    Create {
        store_name: Option<String>,
        store_subdomain: Option<String>,
        header_part: JsonValue,
        record_image: bool,
    },
}

/// The subdomain to persist: a supplied valid non-empty value wins, otherwise
/// the previously stored one survives.
///
/// A supplied value goes through [`Subdomain::parse`] so this path enforces
/// the same alphabet as the template routes; invalid labels are dropped with
/// a warning rather than synced.
#[must_use]
pub fn resolve_subdomain(supplied: Option<&str>, current: Option<&str>) -> Option<String> {
    if let Some(raw) = non_empty(supplied) {
        match Subdomain::parse(&raw) {
            Ok(sub) => return Some(sub.into_inner()),
            Err(err) => {
                tracing::warn!(
                    supplied = %raw,
                    error = %err,
                    "Ignoring invalid store_url during subdomain sync"
                );
            }
        }
    }
    current.map(str::to_owned)
}

/// Merge store name and description into a header blob without replacing it.
///
/// Only non-empty values land; everything else in the header survives. A
/// non-object header is replaced by a fresh object first.
#[must_use]
pub fn merge_header(
    current: &JsonValue,
    store_name: Option<&str>,
    store_description: Option<&str>,
) -> JsonValue {
    let mut header = match current {
        JsonValue::Object(map) => map.clone(),
        _ => Map::new(),
    };
    if let Some(title) = non_empty(store_name) {
        header.insert("title".to_owned(), JsonValue::String(title));
    }
    if let Some(description) = non_empty(store_description) {
        header.insert("description".to_owned(), JsonValue::String(description));
    }
    JsonValue::Object(header)
}

/// Compute the template plan for a settings write.
#[must_use]
pub fn plan_after_settings_write(
    write: &SettingsWrite,
    current: Option<&TemplateSyncState>,
) -> TemplateSyncPlan {
    let record_image = non_empty(write.payment_method_image.as_deref()).is_some();

    match classify(write) {
        WriteKind::NoStoreFields => TemplateSyncPlan::Nothing,
        WriteKind::PaymentAssetOnly => {
            if current.is_some() {
                TemplateSyncPlan::AssetOnly
            } else {
                TemplateSyncPlan::Nothing
            }
        }
        WriteKind::StoreIdentity => current.map_or_else(
            || TemplateSyncPlan::Create {
                store_name: non_empty(write.store_name.as_deref()),
                store_subdomain: resolve_subdomain(write.store_url.as_deref(), None),
                header_part: merge_header(
                    &JsonValue::Object(Map::new()),
                    write.store_name.as_deref(),
                    write.store_description.as_deref(),
                ),
                record_image,
            },
            |state| TemplateSyncPlan::Update {
                store_name: non_empty(write.store_name.as_deref()),
                store_subdomain: resolve_subdomain(
                    write.store_url.as_deref(),
                    state.store_subdomain.as_deref(),
                ),
                header_part: merge_header(
                    &state.header_part,
                    write.store_name.as_deref(),
                    write.store_description.as_deref(),
                ),
                record_image,
            },
        ),
    }
}

/// What to do to the owner's settings after a template write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSyncPlan {
    /// Touch nothing.
    Nothing,
    /// Mirror the supplied fields into the existing settings row.
    Mirror {
        store_name: Option<String>,
        store_url: Option<String>,
    },
    /// No settings row yet; create a stub carrying the store name.
    CreateStub { store_name: String },
}

/// Compute the settings plan for a template write.
#[must_use]
pub fn plan_after_template_write(
    store_name: Option<&str>,
    store_subdomain: Option<&str>,
    settings_exists: bool,
) -> SettingsSyncPlan {
    let store_name = non_empty(store_name);
    let store_url = non_empty(store_subdomain);

    if store_name.is_none() && store_url.is_none() {
        return SettingsSyncPlan::Nothing;
    }
    if settings_exists {
        return SettingsSyncPlan::Mirror {
            store_name,
            store_url,
        };
    }
    store_name.map_or(SettingsSyncPlan::Nothing, |store_name| {
        SettingsSyncPlan::CreateStub { store_name }
    })
}

/// Apply the template side of a settings write. Best-effort: failures are
/// logged, never surfaced.
pub async fn sync_after_settings_write(
    pool: &PgPool,
    owner: OwnerId,
    settings_id: SettingsId,
    write: &SettingsWrite,
) {
    let templates = StoreTemplateRepository::new(pool);
    let current = match templates.find_by_owner(owner).await {
        Ok(template) => template,
        Err(err) => {
            tracing::warn!(%owner, error = %err, "Template sync skipped: lookup failed");
            return;
        }
    };

    let state = current.as_ref().map(TemplateSyncState::from);
    let plan = plan_after_settings_write(write, state.as_ref());
    let image_url = non_empty(write.payment_method_image.as_deref());

    match plan {
        TemplateSyncPlan::Nothing => {}
        TemplateSyncPlan::AssetOnly => {
            // `current` is Some by construction of the plan.
            if let Some(template) = current {
                if let Err(err) = templates.set_settings_id(template.id, settings_id).await {
                    tracing::warn!(%owner, error = %err, "Failed to link settings to template");
                }
                record_image_if_present(pool, template.id, image_url.as_deref()).await;
            }
        }
        TemplateSyncPlan::Update {
            store_name,
            store_subdomain,
            header_part,
            record_image,
        } => {
            if let Some(template) = current {
                let patch = StoreTemplatePatch {
                    settings_id: Some(settings_id),
                    store_name,
                    store_subdomain: Some(store_subdomain),
                    header_part: Some(header_part),
                    ..StoreTemplatePatch::default()
                };
                match templates.update(template.id, &patch).await {
                    Ok(_) => {
                        if record_image {
                            record_image_if_present(pool, template.id, image_url.as_deref()).await;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%owner, error = %err, "Template sync update failed");
                    }
                }
            }
        }
        TemplateSyncPlan::Create {
            store_name,
            store_subdomain,
            header_part,
            record_image,
        } => {
            let new = NewStoreTemplate {
                settings_id: Some(settings_id),
                store_name,
                store_subdomain,
                header_part: Some(header_part),
                ..NewStoreTemplate::default()
            };
            match templates.create(owner, new).await {
                Ok(template) => {
                    if record_image {
                        record_image_if_present(pool, template.id, image_url.as_deref()).await;
                    }
                }
                Err(err) => {
                    tracing::warn!(%owner, error = %err, "Template sync create failed");
                }
            }
        }
    }
}

/// Apply the settings side of a template write. Best-effort: failures are
/// logged, never surfaced.
pub async fn sync_after_template_write(
    pool: &PgPool,
    auth: &AuthClient,
    template: &StoreTemplate,
    store_name: Option<&str>,
    store_subdomain: Option<&str>,
) {
    let settings = SettingsRepository::new(pool);
    let existing = match settings.latest_for_owner(template.user_id).await {
        Ok(row) => row,
        Err(err) => {
            tracing::warn!(
                owner = %template.user_id,
                error = %err,
                "Settings sync skipped: lookup failed"
            );
            return;
        }
    };

    match plan_after_template_write(store_name, store_subdomain, existing.is_some()) {
        SettingsSyncPlan::Nothing => {}
        SettingsSyncPlan::Mirror {
            store_name,
            store_url,
        } => {
            // `existing` is Some by construction of the plan.
            if let Some(row) = existing {
                if let Err(err) = settings
                    .update_store_identity(row.id, store_name.as_deref(), store_url.as_deref())
                    .await
                {
                    tracing::warn!(
                        owner = %template.user_id,
                        error = %err,
                        "Settings sync mirror failed"
                    );
                }
                link_settings_if_unlinked(pool, template, row.id).await;
            }
        }
        SettingsSyncPlan::CreateStub { store_name } => {
            let email = stub_email(auth, template.user_id).await;
            let stub = NewSettings {
                first_name: "Store".to_owned(),
                last_name: "Owner".to_owned(),
                email_address: email,
                phone_number: None,
                store_name,
                store_description: None,
                store_url: non_empty(store_subdomain),
                payment_method_image: None,
            };
            match settings.create(template.user_id, stub).await {
                Ok(row) => link_settings_if_unlinked(pool, template, row.id).await,
                Err(err) => {
                    tracing::warn!(
                        owner = %template.user_id,
                        error = %err,
                        "Settings sync stub create failed"
                    );
                }
            }
        }
    }
}

/// Append an active payment image row. Partial-sync failures are warnings.
async fn record_image_if_present(
    pool: &PgPool,
    template_id: StoreTemplateId,
    image_url: Option<&str>,
) {
    let Some(url) = image_url else { return };
    if let Err(err) = PaymentImageRepository::new(pool)
        .record_active(template_id, url)
        .await
    {
        tracing::warn!(
            template = %template_id,
            error = %err,
            "Partial sync: settings saved but payment image log write failed"
        );
    }
}

async fn link_settings_if_unlinked(pool: &PgPool, template: &StoreTemplate, id: SettingsId) {
    if template.settings_id.is_some() {
        return;
    }
    if let Err(err) = StoreTemplateRepository::new(pool)
        .set_settings_id(template.id, id)
        .await
    {
        tracing::warn!(
            template = %template.id,
            error = %err,
            "Failed to link settings to template"
        );
    }
}

/// The contact email for a stub settings row: the owner's account email, or
/// a non-routable placeholder when the auth service cannot supply one.
async fn stub_email(auth: &AuthClient, owner: OwnerId) -> String {
    match auth.get_user_by_id(owner).await {
        Ok(user) => user
            .email
            .unwrap_or_else(|| format!("{owner}@owners.invalid")),
        Err(err) => {
            tracing::warn!(%owner, error = %err, "Stub settings falling back to placeholder email");
            format!("{owner}@owners.invalid")
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(subdomain: Option<&str>, header: JsonValue) -> TemplateSyncState {
        TemplateSyncState {
            store_subdomain: subdomain.map(str::to_owned),
            header_part: header,
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&SettingsWrite::default()), WriteKind::NoStoreFields);
        assert_eq!(
            classify(&SettingsWrite {
                payment_method_image: Some("x.png".to_owned()),
                ..SettingsWrite::default()
            }),
            WriteKind::PaymentAssetOnly
        );
        assert_eq!(
            classify(&SettingsWrite {
                store_name: Some("Alpine Goods".to_owned()),
                payment_method_image: Some("x.png".to_owned()),
                ..SettingsWrite::default()
            }),
            WriteKind::StoreIdentity
        );
    }

    #[test]
    fn test_subdomain_never_regresses() {
        // Name-only edit against a template that already has a subdomain.
        let write = SettingsWrite {
            store_name: Some("Alpine Goods".to_owned()),
            ..SettingsWrite::default()
        };
        let current = state(Some("alpine"), json!({}));
        let plan = plan_after_settings_write(&write, Some(&current));
        let TemplateSyncPlan::Update {
            store_subdomain, ..
        } = plan
        else {
            panic!("expected update, got {plan:?}");
        };
        assert_eq!(store_subdomain.as_deref(), Some("alpine"));
    }

    #[test]
    fn test_blank_subdomain_does_not_clear() {
        let write = SettingsWrite {
            store_url: Some("   ".to_owned()),
            ..SettingsWrite::default()
        };
        let current = state(Some("alpine"), json!({}));
        let TemplateSyncPlan::Update {
            store_subdomain, ..
        } = plan_after_settings_write(&write, Some(&current))
        else {
            panic!("expected update");
        };
        assert_eq!(store_subdomain.as_deref(), Some("alpine"));
    }

    #[test]
    fn test_invalid_store_url_does_not_reach_subdomain() {
        // Labels outside [a-z0-9-] must not land via the settings side.
        assert_eq!(
            resolve_subdomain(Some("My Store!"), Some("alpine")).as_deref(),
            Some("alpine")
        );
        assert_eq!(resolve_subdomain(Some("bad_label"), None), None);
        // Valid input is normalized the same way the template routes do it.
        assert_eq!(
            resolve_subdomain(Some(" Alpine "), None).as_deref(),
            Some("alpine")
        );
    }

    #[test]
    fn test_supplied_subdomain_replaces() {
        let write = SettingsWrite {
            store_url: Some("  summit  ".to_owned()),
            ..SettingsWrite::default()
        };
        let current = state(Some("alpine"), json!({}));
        let TemplateSyncPlan::Update {
            store_subdomain, ..
        } = plan_after_settings_write(&write, Some(&current))
        else {
            panic!("expected update");
        };
        assert_eq!(store_subdomain.as_deref(), Some("summit"));
    }

    #[test]
    fn test_payment_asset_only_isolation() {
        let write = SettingsWrite {
            payment_method_image: Some("https://cdn.example/pay.png".to_owned()),
            ..SettingsWrite::default()
        };
        let current = state(Some("alpine"), json!({"title": "Alpine"}));
        assert_eq!(
            plan_after_settings_write(&write, Some(&current)),
            TemplateSyncPlan::AssetOnly
        );
    }

    #[test]
    fn test_payment_asset_only_without_template_does_nothing() {
        let write = SettingsWrite {
            payment_method_image: Some("https://cdn.example/pay.png".to_owned()),
            ..SettingsWrite::default()
        };
        assert_eq!(
            plan_after_settings_write(&write, None),
            TemplateSyncPlan::Nothing
        );
    }

    #[test]
    fn test_no_store_fields_does_nothing() {
        let current = state(Some("alpine"), json!({}));
        assert_eq!(
            plan_after_settings_write(&SettingsWrite::default(), Some(&current)),
            TemplateSyncPlan::Nothing
        );
    }

    #[test]
    fn test_header_merge_preserves_unrelated_keys() {
        let current = json!({"logo": "a.png", "title": "Old"});
        let merged = merge_header(&current, Some("New Name"), None);
        assert_eq!(merged["logo"], "a.png");
        assert_eq!(merged["title"], "New Name");
        assert!(merged.get("description").is_none());
    }

    #[test]
    fn test_header_merge_skips_empty_values() {
        let current = json!({"title": "Keep", "description": "Keep too"});
        let merged = merge_header(&current, Some("  "), Some(""));
        assert_eq!(merged["title"], "Keep");
        assert_eq!(merged["description"], "Keep too");
    }

    #[test]
    fn test_header_merge_replaces_non_object() {
        let merged = merge_header(&json!("scalar"), Some("Alpine"), None);
        assert_eq!(merged, json!({"title": "Alpine"}));
    }

    #[test]
    fn test_create_plan_takes_subdomain_only_when_supplied() {
        let write = SettingsWrite {
            store_name: Some("Alpine Goods".to_owned()),
            store_description: Some("Gear".to_owned()),
            ..SettingsWrite::default()
        };
        let TemplateSyncPlan::Create {
            store_subdomain,
            header_part,
            ..
        } = plan_after_settings_write(&write, None)
        else {
            panic!("expected create");
        };
        assert_eq!(store_subdomain, None);
        assert_eq!(
            header_part,
            json!({"title": "Alpine Goods", "description": "Gear"})
        );
    }

    #[test]
    fn test_template_write_mirrors_into_existing_settings() {
        let plan = plan_after_template_write(Some("Alpine Goods"), Some("alpine"), true);
        assert_eq!(
            plan,
            SettingsSyncPlan::Mirror {
                store_name: Some("Alpine Goods".to_owned()),
                store_url: Some("alpine".to_owned()),
            }
        );
    }

    #[test]
    fn test_template_write_creates_stub_when_name_supplied() {
        let plan = plan_after_template_write(Some("Alpine Goods"), None, false);
        assert_eq!(
            plan,
            SettingsSyncPlan::CreateStub {
                store_name: "Alpine Goods".to_owned(),
            }
        );
    }

    #[test]
    fn test_template_write_subdomain_only_without_settings_does_nothing() {
        assert_eq!(
            plan_after_template_write(None, Some("alpine"), false),
            SettingsSyncPlan::Nothing
        );
    }

    #[test]
    fn test_template_write_nothing_supplied() {
        assert_eq!(
            plan_after_template_write(None, None, true),
            SettingsSyncPlan::Nothing
        );
    }
}

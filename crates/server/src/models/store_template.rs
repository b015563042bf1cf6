//! Store template model and the public resolved view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use shoplark_core::{BaseTemplateId, OwnerId, SettingsId, StoreTemplateId};

/// A seller's customized storefront configuration.
///
/// One row per owner (enforced by a uniqueness constraint). The subdomain is
/// only meaningful once `is_published` is set; uniqueness among published
/// templates is enforced by a partial index.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoreTemplate {
    pub id: StoreTemplateId,
    pub user_id: OwnerId,
    /// Best-effort link to the owner's settings row, populated lazily on
    /// first sync and backfilled by the resolver when recovered via email.
    pub settings_id: Option<SettingsId>,
    pub base_template_id: Option<BaseTemplateId>,
    pub store_name: Option<String>,
    pub store_subdomain: Option<String>,
    pub theme_part: JsonValue,
    pub header_part: JsonValue,
    pub section_part: JsonValue,
    pub footer_part: JsonValue,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The publicly resolved store: template fields plus the payment-display
/// asset produced by the fallback chain.
#[derive(Debug, Clone, Serialize)]
pub struct StoreView {
    #[serde(flatten)]
    pub template: StoreTemplate,
    pub payment_method_image: Option<String>,
}

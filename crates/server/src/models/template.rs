//! Base template gallery model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use shoplark_core::BaseTemplateId;

/// A starting-point template sellers can customize into their own store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BaseTemplate {
    pub id: BaseTemplateId,
    pub template_name: String,
    pub theme_part: JsonValue,
    pub header_part: JsonValue,
    pub section_part: JsonValue,
    pub footer_part: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

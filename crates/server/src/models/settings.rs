//! Owner settings model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shoplark_core::{OwnerId, SettingsId};

/// An owner's profile/contact/store-identity record.
///
/// Kept in sync with the owner's [`StoreTemplate`](super::StoreTemplate) by
/// the [`sync`](crate::services::sync) service; the shared fields are
/// `store_name`, `store_description`, and `store_url` (the subdomain hint).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Settings {
    pub id: SettingsId,
    pub user_id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: Option<String>,
    pub store_name: String,
    pub store_description: Option<String>,
    pub store_url: Option<String>,
    /// Durable fallback for the payment-display asset; the `payment_images`
    /// log is preferred when it has an active row.
    pub payment_method_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Customer model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shoplark_core::{CustomerId, OwnerId};

/// A customer record owned by a seller.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub user_id: OwnerId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

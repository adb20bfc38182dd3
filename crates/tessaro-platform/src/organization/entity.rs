//! Organization Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLAN: &str = "standard";
pub const DEFAULT_STATUS: &str = "active";

/// Organization entity - a tenant of the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Caller-supplied or generated UUID
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name, unique across the store
    pub name: String,

    /// Billing plan
    pub plan: String,

    /// Lifecycle status
    pub status: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(
        id: Option<String>,
        name: impl Into<String>,
        plan: Option<String>,
        status: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name.into(),
            plan: plan.unwrap_or_else(|| DEFAULT_PLAN.to_string()),
            status: status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

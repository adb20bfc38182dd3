//! Service Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS: &str = "active";

/// Service entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Caller-supplied or generated UUID
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name, unique across the store
    pub name: String,

    pub service_type: String,

    pub status: String,

    /// Organizations the service is assigned to
    #[serde(default)]
    pub organization_ids: Vec<String>,

    /// Denormalized assignment count; falls back to the list length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_count: Option<i64>,

    pub description: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Option<String>,
        name: impl Into<String>,
        service_type: impl Into<String>,
        status: Option<String>,
        organization_ids: Vec<String>,
        organization_count: Option<i64>,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let count = organization_count.unwrap_or(organization_ids.len() as i64);
        Self {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name.into(),
            service_type: service_type.into(),
            status: status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            organization_ids,
            organization_count: Some(count),
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// The count reported on the wire.
    pub fn effective_organization_count(&self) -> i64 {
        self.organization_count
            .unwrap_or(self.organization_ids.len() as i64)
    }
}

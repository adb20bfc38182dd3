//! Session Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session entity, keyed by the caller-supplied token hash. Writes are
/// full replaces; `created_at` only exists on documents written by the
/// create path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,

    pub token_hash: String,

    pub user_id: Option<String>,
    pub organization_id: Option<String>,

    /// Opaque caller-supplied instants
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime_optional"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

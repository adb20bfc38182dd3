//! User Credential Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored credential, keyed by user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    /// Hex-encoded PBKDF2-HMAC-SHA256 digest
    pub password_hash: String,

    /// Hex-encoded random salt
    pub salt: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

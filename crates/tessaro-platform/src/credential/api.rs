//! Credentials API
//!
//! Write-only: set or rotate a user's password hash.

use std::sync::Arc;

use serde_json::Value;

use super::password::PasswordHasher;
use super::repository::CredentialRepository;
use crate::gateway::response::ApiResponse;
use crate::shared::api_common::normalize_json_string;
use crate::shared::error::{ApiError, Result};

/// Credentials service state
#[derive(Clone)]
pub struct CredentialsState {
    pub credential_repo: Arc<CredentialRepository>,
    pub password_hasher: Arc<PasswordHasher>,
}

pub async fn upsert_credential(state: &CredentialsState, body: &Value) -> Result<ApiResponse> {
    let user_id = normalize_json_string(body.get("user_id"))
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    // Passwords are taken verbatim, not trimmed; only the empty string is
    // rejected.
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("password is required"))?;

    let (salt, password_hash) = state.password_hasher.hash_password(password);
    state
        .credential_repo
        .upsert(&user_id, &password_hash, &salt)
        .await?;

    Ok(ApiResponse::no_content())
}

//! Sessions API
//!
//! Create/replace/fetch/delete by token hash. Replaces are whole-document
//! writes that preserve only the key.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::Session;
use super::repository::SessionRepository;
use crate::gateway::response::ApiResponse;
use crate::shared::api_common::normalize_opt;
use crate::shared::error::{ApiError, Result};

/// Sessions service state
#[derive(Clone)]
pub struct SessionsState {
    pub session_repo: Arc<SessionRepository>,
}

/// Fields a caller may supply for a session document
#[derive(Debug, Default, Deserialize)]
struct SessionBody {
    token_hash: Option<String>,
    user_id: Option<String>,
    organization_id: Option<String>,
    issued_at: Option<String>,
    expires_at: Option<String>,
}

impl SessionBody {
    fn parse(body: &Value) -> Result<Self> {
        serde_json::from_value(body.clone())
            .map_err(|_| ApiError::validation("request body must be an object"))
    }
}

/// Session response DTO; internal timestamps are not exposed
#[derive(Debug, Serialize)]
struct SessionResponse {
    token_hash: String,
    user_id: Option<String>,
    organization_id: Option<String>,
    issued_at: Option<String>,
    expires_at: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            token_hash: s.token_hash,
            user_id: s.user_id,
            organization_id: s.organization_id,
            issued_at: s.issued_at,
            expires_at: s.expires_at,
        }
    }
}

pub async fn create_session(state: &SessionsState, body: &Value) -> Result<ApiResponse> {
    let fields = SessionBody::parse(body)?;
    let token_hash = normalize_opt(fields.token_hash)
        .ok_or_else(|| ApiError::validation("token_hash is required"))?;

    let now = Utc::now();
    let session = Session {
        id: token_hash.clone(),
        token_hash,
        user_id: fields.user_id,
        organization_id: fields.organization_id,
        issued_at: fields.issued_at,
        expires_at: fields.expires_at,
        created_at: Some(now),
        updated_at: now,
    };
    state.session_repo.replace(&session).await?;

    Ok(ApiResponse::created_empty())
}

pub async fn get_session(state: &SessionsState, token_hash: &str) -> Result<ApiResponse> {
    let session = state
        .session_repo
        .find_by_hash(token_hash)
        .await?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;
    ApiResponse::ok(&SessionResponse::from(session))
}

/// Full replace of the mutable fields; the key is taken from the path,
/// never the body, and `created_at` is not carried over.
pub async fn replace_session(
    state: &SessionsState,
    token_hash: &str,
    body: &Value,
) -> Result<ApiResponse> {
    let fields = SessionBody::parse(body)?;

    let session = Session {
        id: token_hash.to_string(),
        token_hash: token_hash.to_string(),
        user_id: fields.user_id,
        organization_id: fields.organization_id,
        issued_at: fields.issued_at,
        expires_at: fields.expires_at,
        created_at: None,
        updated_at: Utc::now(),
    };
    state.session_repo.replace(&session).await?;

    Ok(ApiResponse::no_content())
}

/// Removing an absent session is still a success.
pub async fn delete_session(state: &SessionsState, token_hash: &str) -> Result<ApiResponse> {
    state.session_repo.delete(token_hash).await?;
    Ok(ApiResponse::no_content())
}

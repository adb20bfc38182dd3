//! Users API
//!
//! CRUD plus lookup by email and organization filtering. Every read path
//! applies the membership visibility rule; responses embed the full
//! organization documents for the user's ids.

use std::collections::HashMap;
use std::sync::Arc;

use bson::{Bson, Document};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::entity::{User, UserRole};
use super::repository::UserRepository;
use crate::gateway::request::Query;
use crate::gateway::response::ApiResponse;
use crate::organization::api::{organizations_map, resolve_organization_ids, OrganizationResponse};
use crate::organization::repository::OrganizationRepository;
use crate::shared::api_common::{normalize_json_string, CountResponse};
use crate::shared::error::{ApiError, Result};

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub user_repo: Arc<UserRepository>,
    pub organization_repo: Arc<OrganizationRepository>,
}

/// User response DTO with embedded organizations
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub organizations: Vec<OrganizationResponse>,
}

impl UserResponse {
    /// Organizations are embedded in membership order; ids the map does
    /// not know (dangling references) are skipped.
    fn build(user: User, organizations: &HashMap<String, OrganizationResponse>) -> Self {
        let embedded = user
            .organization_ids
            .iter()
            .filter_map(|id| organizations.get(id).cloned())
            .collect();
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar_url: user.avatar_url,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
            organizations: embedded,
        }
    }
}

async fn single_user_response(state: &UsersState, user: User) -> Result<ApiResponse> {
    let organizations = organizations_map(&state.organization_repo, &user.organization_ids).await?;
    ApiResponse::ok(&UserResponse::build(user, &organizations))
}

pub async fn list_users(state: &UsersState, query: &Query) -> Result<ApiResponse> {
    let organization_filter = query.first("organization_id");
    let filter = organization_filter.as_deref();

    if query.first("summary").as_deref() == Some("count") {
        let count = state
            .user_repo
            .find_all()
            .await?
            .iter()
            .filter(|u| u.is_visible(filter))
            .count();
        return ApiResponse::ok(&CountResponse { count: count as u64 });
    }

    if let Some(email) = query.first("email") {
        let user = state
            .user_repo
            .find_by_email(&email)
            .await?
            .filter(|u| u.is_visible(filter))
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        return single_user_response(state, user).await;
    }

    let users: Vec<User> = state
        .user_repo
        .find_all()
        .await?
        .into_iter()
        .filter(|u| u.is_visible(filter))
        .collect();

    let mut all_organization_ids: Vec<String> = Vec::new();
    for user in &users {
        for id in &user.organization_ids {
            if !all_organization_ids.contains(id) {
                all_organization_ids.push(id.clone());
            }
        }
    }
    let organizations = organizations_map(&state.organization_repo, &all_organization_ids).await?;

    let payload: Vec<UserResponse> = users
        .into_iter()
        .map(|u| UserResponse::build(u, &organizations))
        .collect();
    ApiResponse::ok(&payload)
}

pub async fn get_user(state: &UsersState, id: &str, query: &Query) -> Result<ApiResponse> {
    let organization_filter = query.first("organization_id");
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .filter(|u| u.is_visible(organization_filter.as_deref()))
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    single_user_response(state, user).await
}

pub async fn create_user(state: &UsersState, body: &Value) -> Result<ApiResponse> {
    let name = normalize_json_string(body.get("name"));
    let email = normalize_json_string(body.get("email"))
        .ok_or_else(|| ApiError::validation("email is required"))?;
    let role = UserRole::parse(normalize_json_string(body.get("role")).as_deref())?;
    let avatar_url = normalize_json_string(body.get("avatar_url"));

    let (organization_ids, missing) =
        resolve_organization_ids(&state.organization_repo, body.get("organization_ids")).await?;
    if !missing.is_empty() {
        return Err(ApiError::validation(format!(
            "organizations not found: {}",
            missing.join(", ")
        )));
    }
    if organization_ids.is_empty() {
        return Err(ApiError::validation("organization_ids required"));
    }

    let id = normalize_json_string(body.get("id"));
    let user = User::new(id, name, email, role, avatar_url, organization_ids);

    state.user_repo.insert(&user).await.map_err(|err| {
        if err.is_duplicate() {
            ApiError::duplicate("user already exists")
        } else {
            err
        }
    })?;

    let organizations = organizations_map(&state.organization_repo, &user.organization_ids).await?;
    ApiResponse::created(&UserResponse::build(user, &organizations))
}

pub async fn update_user(state: &UsersState, id: &str, body: &Value) -> Result<ApiResponse> {
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let mut updates = Document::new();

    if body.get("name").is_some() {
        let name = normalize_json_string(body.get("name")).unwrap_or_else(|| user.name.clone());
        updates.insert("name", name);
    }
    if body.get("email").is_some() {
        let email = normalize_json_string(body.get("email"))
            .ok_or_else(|| ApiError::validation("email cannot be empty"))?;
        updates.insert("email", email);
    }
    if body.get("role").is_some() {
        let role = UserRole::parse(normalize_json_string(body.get("role")).as_deref())?;
        updates.insert("role", role.as_str());
    }
    if body.get("avatar_url").is_some() {
        match normalize_json_string(body.get("avatar_url")) {
            Some(url) => updates.insert("avatar_url", url),
            None => updates.insert("avatar_url", Bson::Null),
        };
    }
    if body.get("organization_ids").is_some() {
        let (organization_ids, missing) =
            resolve_organization_ids(&state.organization_repo, body.get("organization_ids"))
                .await?;
        if !missing.is_empty() {
            return Err(ApiError::validation(format!(
                "organizations not found: {}",
                missing.join(", ")
            )));
        }
        updates.insert("organization_ids", organization_ids);
    }

    if updates.is_empty() {
        return single_user_response(state, user).await;
    }

    updates.insert("updated_at", bson::DateTime::from_chrono(Utc::now()));
    state
        .user_repo
        .update_fields(id, updates)
        .await
        .map_err(|err| {
            if err.is_duplicate() {
                ApiError::duplicate("email already in use")
            } else {
                err
            }
        })?;

    let updated = state.user_repo.find_by_id(id).await?.unwrap_or(user);
    single_user_response(state, updated).await
}

pub async fn delete_user(state: &UsersState, id: &str) -> Result<ApiResponse> {
    if !state.user_repo.delete(id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(ApiResponse::no_content())
}

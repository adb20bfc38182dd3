//! Organizations API
//!
//! CRUD over organizations, including the best-effort reference cleanup
//! that runs when one is deleted.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bson::Document;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::entity::Organization;
use super::repository::OrganizationRepository;
use crate::gateway::request::Query;
use crate::gateway::response::ApiResponse;
use crate::service::repository::ServiceRepository;
use crate::shared::api_common::{normalize_json_string, dedupe_identifiers, CountResponse};
use crate::shared::error::{ApiError, Result};
use crate::user::repository::UserRepository;

/// Organizations service state
#[derive(Clone)]
pub struct OrganizationsState {
    pub organization_repo: Arc<OrganizationRepository>,
    pub user_repo: Arc<UserRepository>,
    pub service_repo: Arc<ServiceRepository>,
}

/// Organization response DTO
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub plan: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Organization> for OrganizationResponse {
    fn from(o: Organization) -> Self {
        Self {
            id: o.id,
            name: o.name,
            plan: o.plan,
            status: o.status,
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

/// Normalize a raw `organization_ids` value and split it into the
/// deduplicated id list and the subset that names no stored organization.
pub async fn resolve_organization_ids(
    repo: &OrganizationRepository,
    raw: Option<&Value>,
) -> Result<(Vec<String>, Vec<String>)> {
    let list = match raw.and_then(Value::as_array) {
        Some(list) => list,
        None => return Ok((Vec::new(), Vec::new())),
    };

    let normalized = dedupe_identifiers(list);
    if normalized.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let existing: HashSet<String> = repo
        .find_by_ids(&normalized)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();
    let missing = normalized
        .iter()
        .filter(|id| !existing.contains(*id))
        .cloned()
        .collect();

    Ok((normalized, missing))
}

/// Load the named organizations into an id-keyed response map, for
/// embedding into user payloads. Unknown ids are simply absent.
pub async fn organizations_map(
    repo: &OrganizationRepository,
    ids: &[String],
) -> Result<HashMap<String, OrganizationResponse>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let organizations = repo.find_by_ids(ids).await?;
    Ok(organizations
        .into_iter()
        .map(|o| (o.id.clone(), o.into()))
        .collect())
}

pub async fn list_organizations(state: &OrganizationsState, query: &Query) -> Result<ApiResponse> {
    if query.first("summary").as_deref() == Some("count") {
        let count = state.organization_repo.count().await?;
        return ApiResponse::ok(&CountResponse { count });
    }

    let organizations = state.organization_repo.find_all().await?;
    let payload: Vec<OrganizationResponse> = organizations.into_iter().map(Into::into).collect();
    ApiResponse::ok(&payload)
}

pub async fn get_organization(state: &OrganizationsState, id: &str) -> Result<ApiResponse> {
    let organization = state
        .organization_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;
    ApiResponse::ok(&OrganizationResponse::from(organization))
}

pub async fn create_organization(state: &OrganizationsState, body: &Value) -> Result<ApiResponse> {
    let name = normalize_json_string(body.get("name"))
        .ok_or_else(|| ApiError::validation("name is required"))?;
    let plan = normalize_json_string(body.get("plan"));
    let status = normalize_json_string(body.get("status"));
    let id = normalize_json_string(body.get("id"));

    let organization = Organization::new(id, name, plan, status);
    state
        .organization_repo
        .insert(&organization)
        .await
        .map_err(|err| {
            if err.is_duplicate() {
                ApiError::duplicate("organization already exists")
            } else {
                err
            }
        })?;

    ApiResponse::created(&OrganizationResponse::from(organization))
}

pub async fn update_organization(
    state: &OrganizationsState,
    id: &str,
    body: &Value,
) -> Result<ApiResponse> {
    let organization = state
        .organization_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    let mut updates = Document::new();

    if body.get("name").is_some() {
        let name = normalize_json_string(body.get("name"))
            .ok_or_else(|| ApiError::validation("name cannot be empty"))?;
        updates.insert("name", name);
    }
    if body.get("plan").is_some() {
        let plan = normalize_json_string(body.get("plan")).unwrap_or_else(|| organization.plan.clone());
        updates.insert("plan", plan);
    }
    if body.get("status").is_some() {
        let status =
            normalize_json_string(body.get("status")).unwrap_or_else(|| organization.status.clone());
        updates.insert("status", status);
    }

    if updates.is_empty() {
        return ApiResponse::ok(&OrganizationResponse::from(organization));
    }

    updates.insert("updated_at", bson::DateTime::from_chrono(Utc::now()));
    state
        .organization_repo
        .update_fields(id, updates)
        .await
        .map_err(|err| {
            if err.is_duplicate() {
                ApiError::duplicate("organization name already in use")
            } else {
                err
            }
        })?;

    let updated = state
        .organization_repo
        .find_by_id(id)
        .await?
        .unwrap_or(organization);
    ApiResponse::ok(&OrganizationResponse::from(updated))
}

pub async fn delete_organization(state: &OrganizationsState, id: &str) -> Result<ApiResponse> {
    if !state.organization_repo.delete(id).await? {
        return Err(ApiError::not_found("Organization not found"));
    }

    // Best-effort cascade, not atomic with the delete.
    state.user_repo.remove_organization(id).await?;
    state.service_repo.remove_organization(id).await?;

    tracing::info!(organization_id = %id, "organization deleted, references pulled");
    Ok(ApiResponse::no_content())
}

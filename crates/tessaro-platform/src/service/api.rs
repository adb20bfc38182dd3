//! Services API
//!
//! CRUD plus the bulk `query` lookup used by tenant frontends to load the
//! services visible to a set of organizations.

use std::sync::Arc;

use bson::{Bson, Document};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::entity::Service;
use super::repository::ServiceRepository;
use crate::gateway::request::Query;
use crate::gateway::response::ApiResponse;
use crate::organization::api::resolve_organization_ids;
use crate::organization::repository::OrganizationRepository;
use crate::shared::api_common::{normalize_json_string, require_integer, CountResponse};
use crate::shared::error::{ApiError, Result};

/// Services service state
#[derive(Clone)]
pub struct ServicesState {
    pub service_repo: Arc<ServiceRepository>,
    pub organization_repo: Arc<OrganizationRepository>,
}

/// Service response DTO
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub service_type: String,
    pub status: String,
    pub organization_count: i64,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        let organization_count = s.effective_organization_count();
        Self {
            id: s.id,
            name: s.name,
            service_type: s.service_type,
            status: s.status,
            organization_count,
            description: s.description,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// A `description` may arrive as any JSON value; non-strings are kept as
/// their JSON text.
fn coerce_description(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

pub async fn list_services(state: &ServicesState, query: &Query) -> Result<ApiResponse> {
    if query.first("summary").as_deref() == Some("count") {
        let count = state.service_repo.count().await?;
        return ApiResponse::ok(&CountResponse { count });
    }

    let services = state.service_repo.find_all().await?;
    let payload: Vec<ServiceResponse> = services.into_iter().map(Into::into).collect();
    ApiResponse::ok(&payload)
}

pub async fn get_service(state: &ServicesState, id: &str) -> Result<ApiResponse> {
    let service = state
        .service_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;
    ApiResponse::ok(&ServiceResponse::from(service))
}

/// Bulk lookup by organization ids. Unknown ids are ignored rather than
/// rejected; an empty resolved set short-circuits to an empty list.
pub async fn query_services(state: &ServicesState, body: &Value) -> Result<ApiResponse> {
    let (organization_ids, _missing) =
        resolve_organization_ids(&state.organization_repo, body.get("organization_ids")).await?;
    if organization_ids.is_empty() {
        return ApiResponse::ok(&Vec::<ServiceResponse>::new());
    }

    let services = state
        .service_repo
        .find_by_organization_ids(&organization_ids)
        .await?;
    let payload: Vec<ServiceResponse> = services.into_iter().map(Into::into).collect();
    ApiResponse::ok(&payload)
}

pub async fn create_service(state: &ServicesState, body: &Value) -> Result<ApiResponse> {
    let (organization_ids, missing) =
        resolve_organization_ids(&state.organization_repo, body.get("organization_ids")).await?;
    if !missing.is_empty() {
        return Err(ApiError::validation(format!(
            "organizations not found: {}",
            missing.join(", ")
        )));
    }

    let name = normalize_json_string(body.get("name"))
        .ok_or_else(|| ApiError::validation("name is required"))?;
    let service_type = normalize_json_string(body.get("service_type"))
        .ok_or_else(|| ApiError::validation("service_type is required"))?;
    let status = normalize_json_string(body.get("status"));
    let description = coerce_description(body.get("description"));
    let organization_count = match body.get("organization_count") {
        Some(Value::Null) | None => None,
        value => Some(require_integer(value, "organization_count must be numeric")?),
    };
    let id = normalize_json_string(body.get("id"));

    let service = Service::new(
        id,
        name,
        service_type,
        status,
        organization_ids,
        organization_count,
        description,
    );

    state.service_repo.insert(&service).await.map_err(|err| {
        if err.is_duplicate() {
            ApiError::duplicate("service already exists")
        } else {
            err
        }
    })?;

    ApiResponse::created(&ServiceResponse::from(service))
}

pub async fn update_service(state: &ServicesState, id: &str, body: &Value) -> Result<ApiResponse> {
    let service = state
        .service_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;

    let mut updates = Document::new();

    if body.get("name").is_some() {
        let name = normalize_json_string(body.get("name"))
            .ok_or_else(|| ApiError::validation("name cannot be empty"))?;
        updates.insert("name", name);
    }
    if body.get("service_type").is_some() {
        let service_type = normalize_json_string(body.get("service_type"))
            .ok_or_else(|| ApiError::validation("service_type cannot be empty"))?;
        updates.insert("service_type", service_type);
    }
    if body.get("status").is_some() {
        let status =
            normalize_json_string(body.get("status")).unwrap_or_else(|| service.status.clone());
        updates.insert("status", status);
    }
    if body.get("description").is_some() {
        match coerce_description(body.get("description")) {
            Some(description) => updates.insert("description", description),
            None => updates.insert("description", Bson::Null),
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
    if body.get("organization_count").is_some() {
        let count = require_integer(
            body.get("organization_count"),
            "organization_count must be numeric",
        )?;
        updates.insert("organization_count", count);
    }

    if updates.is_empty() {
        return ApiResponse::ok(&ServiceResponse::from(service));
    }

    updates.insert("updated_at", bson::DateTime::from_chrono(Utc::now()));
    state
        .service_repo
        .update_fields(id, updates)
        .await
        .map_err(|err| {
            if err.is_duplicate() {
                ApiError::duplicate("service name already in use")
            } else {
                err
            }
        })?;

    let updated = state.service_repo.find_by_id(id).await?.unwrap_or(service);
    ApiResponse::ok(&ServiceResponse::from(updated))
}

pub async fn delete_service(state: &ServicesState, id: &str) -> Result<ApiResponse> {
    if !state.service_repo.delete(id).await? {
        return Err(ApiError::not_found("Service not found"));
    }
    Ok(ApiResponse::no_content())
}

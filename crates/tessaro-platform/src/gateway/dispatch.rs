//! Dispatcher
//!
//! Routes the canonical request on its path segments. Resolution is a
//! pure function from (method, path) to an [`Endpoint`], so the 404/405
//! taxonomy is testable without a store; execution then hands the request
//! to the owning aggregate.

use crate::credential::api::{self as credential_api, CredentialsState};
use crate::gateway::invocation::Invocation;
use crate::gateway::request::ApiRequest;
use crate::gateway::response::ApiResponse;
use crate::metric::api::{self as metric_api, MetricsState};
use crate::organization::api::{self as organization_api, OrganizationsState};
use crate::service::api::{self as service_api, ServicesState};
use crate::session::api::{self as session_api, SessionsState};
use crate::shared::error::{ApiError, Result};
use crate::user::api::{self as user_api, UsersState};

/// The fixed tenant/application prefix every route starts with.
pub const ROUTE_PREFIX: &str = "tessaro";

/// Handler states for every aggregate, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: UsersState,
    pub organizations: OrganizationsState,
    pub services: ServicesState,
    pub metrics: MetricsState,
    pub sessions: SessionsState,
    pub credentials: CredentialsState,
}

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListUsers,
    GetUser(String),
    CreateUser,
    UpdateUser(String),
    DeleteUser(String),

    ListOrganizations,
    GetOrganization(String),
    CreateOrganization,
    UpdateOrganization(String),
    DeleteOrganization(String),

    ListServices,
    GetService(String),
    CreateService,
    UpdateService(String),
    DeleteService(String),
    QueryServices,

    IncrementMetric,
    GetNumberMetric,
    SetNumberMetric,
    GetTimestampMetric,
    SetTimestampMetric,

    CreateSession,
    GetSession(String),
    ReplaceSession(String),
    DeleteSession(String),

    UpsertCredential,
}

impl Endpoint {
    /// Resolve a method and path to an endpoint, or the 400/404/405 the
    /// route taxonomy prescribes.
    pub fn resolve(method: &str, path: &str) -> Result<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 || segments[0] != ROUTE_PREFIX {
            return Err(ApiError::not_found("Not found"));
        }

        let id = segments.get(2).copied();

        match segments[1] {
            "users" => match (method, id) {
                ("GET", Some(id)) => Ok(Self::GetUser(id.to_string())),
                ("GET", None) => Ok(Self::ListUsers),
                ("POST", _) => Ok(Self::CreateUser),
                ("PATCH", Some(id)) | ("PUT", Some(id)) => Ok(Self::UpdateUser(id.to_string())),
                ("DELETE", Some(id)) => Ok(Self::DeleteUser(id.to_string())),
                _ => Err(ApiError::MethodNotAllowed),
            },
            "organizations" => match (method, id) {
                ("GET", Some(id)) => Ok(Self::GetOrganization(id.to_string())),
                ("GET", None) => Ok(Self::ListOrganizations),
                ("POST", _) => Ok(Self::CreateOrganization),
                ("PATCH", Some(id)) | ("PUT", Some(id)) => {
                    Ok(Self::UpdateOrganization(id.to_string()))
                }
                ("DELETE", Some(id)) => Ok(Self::DeleteOrganization(id.to_string())),
                _ => Err(ApiError::MethodNotAllowed),
            },
            "services" => match (method, id) {
                ("POST", Some("query")) => Ok(Self::QueryServices),
                ("GET", Some(id)) => Ok(Self::GetService(id.to_string())),
                ("GET", None) => Ok(Self::ListServices),
                ("POST", _) => Ok(Self::CreateService),
                ("PATCH", Some(id)) | ("PUT", Some(id)) => Ok(Self::UpdateService(id.to_string())),
                ("DELETE", Some(id)) => Ok(Self::DeleteService(id.to_string())),
                _ => Err(ApiError::MethodNotAllowed),
            },
            "metrics" => match (method, id) {
                ("POST", Some("increment")) => Ok(Self::IncrementMetric),
                ("GET", Some("number")) => Ok(Self::GetNumberMetric),
                ("POST", Some("number")) => Ok(Self::SetNumberMetric),
                (_, Some("number")) => Err(ApiError::MethodNotAllowed),
                ("GET", Some("timestamp")) => Ok(Self::GetTimestampMetric),
                ("POST", Some("timestamp")) => Ok(Self::SetTimestampMetric),
                (_, Some("timestamp")) => Err(ApiError::MethodNotAllowed),
                _ => Err(ApiError::not_found("Metric endpoint not found")),
            },
            "sessions" => {
                if method == "POST" {
                    return Ok(Self::CreateSession);
                }
                let hash = id
                    .ok_or_else(|| ApiError::validation("session token hash is required"))?
                    .to_string();
                match method {
                    "GET" => Ok(Self::GetSession(hash)),
                    "PUT" => Ok(Self::ReplaceSession(hash)),
                    "DELETE" => Ok(Self::DeleteSession(hash)),
                    _ => Err(ApiError::MethodNotAllowed),
                }
            }
            "user-credentials" => match method {
                "POST" => Ok(Self::UpsertCredential),
                _ => Err(ApiError::MethodNotAllowed),
            },
            _ => Err(ApiError::not_found("Not found")),
        }
    }
}

/// Route a canonical request and execute the matched handler.
pub async fn dispatch(state: &AppState, req: &ApiRequest) -> ApiResponse {
    match route(state, req).await {
        Ok(response) => response,
        Err(err) => ApiResponse::error(&err),
    }
}

/// Normalize a function-runtime invocation and dispatch it.
pub async fn dispatch_invocation(state: &AppState, invocation: &Invocation) -> ApiResponse {
    match invocation.normalize() {
        Ok(req) => dispatch(state, &req).await,
        Err(err) => ApiResponse::error(&err),
    }
}

async fn route(state: &AppState, req: &ApiRequest) -> Result<ApiResponse> {
    tracing::debug!(method = %req.method, path = %req.path, "dispatching request");

    match Endpoint::resolve(&req.method, &req.path)? {
        Endpoint::ListUsers => user_api::list_users(&state.users, &req.query).await,
        Endpoint::GetUser(id) => user_api::get_user(&state.users, &id, &req.query).await,
        Endpoint::CreateUser => user_api::create_user(&state.users, &req.body).await,
        Endpoint::UpdateUser(id) => user_api::update_user(&state.users, &id, &req.body).await,
        Endpoint::DeleteUser(id) => user_api::delete_user(&state.users, &id).await,

        Endpoint::ListOrganizations => {
            organization_api::list_organizations(&state.organizations, &req.query).await
        }
        Endpoint::GetOrganization(id) => {
            organization_api::get_organization(&state.organizations, &id).await
        }
        Endpoint::CreateOrganization => {
            organization_api::create_organization(&state.organizations, &req.body).await
        }
        Endpoint::UpdateOrganization(id) => {
            organization_api::update_organization(&state.organizations, &id, &req.body).await
        }
        Endpoint::DeleteOrganization(id) => {
            organization_api::delete_organization(&state.organizations, &id).await
        }

        Endpoint::ListServices => service_api::list_services(&state.services, &req.query).await,
        Endpoint::GetService(id) => service_api::get_service(&state.services, &id).await,
        Endpoint::CreateService => service_api::create_service(&state.services, &req.body).await,
        Endpoint::UpdateService(id) => {
            service_api::update_service(&state.services, &id, &req.body).await
        }
        Endpoint::DeleteService(id) => service_api::delete_service(&state.services, &id).await,
        Endpoint::QueryServices => service_api::query_services(&state.services, &req.body).await,

        Endpoint::IncrementMetric => metric_api::increment_metric(&state.metrics, &req.body).await,
        Endpoint::GetNumberMetric => {
            metric_api::get_number_metric(&state.metrics, &req.query).await
        }
        Endpoint::SetNumberMetric => metric_api::set_number_metric(&state.metrics, &req.body).await,
        Endpoint::GetTimestampMetric => {
            metric_api::get_timestamp_metric(&state.metrics, &req.query).await
        }
        Endpoint::SetTimestampMetric => {
            metric_api::set_timestamp_metric(&state.metrics, &req.body).await
        }

        Endpoint::CreateSession => session_api::create_session(&state.sessions, &req.body).await,
        Endpoint::GetSession(hash) => session_api::get_session(&state.sessions, &hash).await,
        Endpoint::ReplaceSession(hash) => {
            session_api::replace_session(&state.sessions, &hash, &req.body).await
        }
        Endpoint::DeleteSession(hash) => session_api::delete_session(&state.sessions, &hash).await,

        Endpoint::UpsertCredential => {
            credential_api::upsert_credential(&state.credentials, &req.body).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn requires_the_tenant_prefix() {
        let err = Endpoint::resolve("GET", "/other/users").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = Endpoint::resolve("GET", "/tessaro").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let err = Endpoint::resolve("GET", "/tessaro/widgets").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_routes_resolve() {
        assert_eq!(Endpoint::resolve("GET", "/tessaro/users").unwrap(), Endpoint::ListUsers);
        assert_eq!(
            Endpoint::resolve("GET", "/tessaro/users/u-1").unwrap(),
            Endpoint::GetUser("u-1".to_string())
        );
        assert_eq!(Endpoint::resolve("POST", "/tessaro/users").unwrap(), Endpoint::CreateUser);
        assert_eq!(
            Endpoint::resolve("PATCH", "/tessaro/users/u-1").unwrap(),
            Endpoint::UpdateUser("u-1".to_string())
        );
        assert_eq!(
            Endpoint::resolve("PUT", "/tessaro/users/u-1").unwrap(),
            Endpoint::UpdateUser("u-1".to_string())
        );
        assert_eq!(
            Endpoint::resolve("DELETE", "/tessaro/users/u-1").unwrap(),
            Endpoint::DeleteUser("u-1".to_string())
        );
    }

    #[test]
    fn update_without_id_is_method_not_allowed() {
        let err = Endpoint::resolve("PATCH", "/tessaro/users").unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        let err = Endpoint::resolve("DELETE", "/tessaro/organizations").unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn services_query_subresource_resolves() {
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/services/query").unwrap(),
            Endpoint::QueryServices
        );
        // GET on /query reads it as an id lookup, same as any other segment.
        assert_eq!(
            Endpoint::resolve("GET", "/tessaro/services/query").unwrap(),
            Endpoint::GetService("query".to_string())
        );
    }

    #[test]
    fn metric_routes_resolve() {
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/metrics/increment").unwrap(),
            Endpoint::IncrementMetric
        );
        assert_eq!(
            Endpoint::resolve("GET", "/tessaro/metrics/number").unwrap(),
            Endpoint::GetNumberMetric
        );
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/metrics/timestamp").unwrap(),
            Endpoint::SetTimestampMetric
        );
    }

    #[test]
    fn unknown_metric_endpoint_is_not_found() {
        let err = Endpoint::resolve("GET", "/tessaro/metrics").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Metric endpoint not found");
        let err = Endpoint::resolve("GET", "/tessaro/metrics/increment").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn metric_value_endpoints_reject_other_methods() {
        let err = Endpoint::resolve("DELETE", "/tessaro/metrics/number").unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn session_routes_require_a_hash() {
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/sessions").unwrap(),
            Endpoint::CreateSession
        );
        let err = Endpoint::resolve("GET", "/tessaro/sessions").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "session token hash is required");
        assert_eq!(
            Endpoint::resolve("PUT", "/tessaro/sessions/abc123").unwrap(),
            Endpoint::ReplaceSession("abc123".to_string())
        );
        let err = Endpoint::resolve("PATCH", "/tessaro/sessions/abc123").unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn credentials_are_post_only() {
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/user-credentials").unwrap(),
            Endpoint::UpsertCredential
        );
        let err = Endpoint::resolve("GET", "/tessaro/user-credentials").unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

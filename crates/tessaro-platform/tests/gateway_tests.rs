//! Gateway Integration Tests
//!
//! End-to-end coverage of the request boundary: invocation normalization,
//! path overrides, body parsing, endpoint resolution, and response
//! formatting. Everything here runs without a store.

use axum::http::StatusCode;
use serde_json::json;

use tessaro_platform::gateway::{ApiRequest, Endpoint, Headers, Invocation, Query};
use tessaro_platform::{ApiError, ApiResponse, UserRole};

// Invocation normalization across context shapes
mod invocation_tests {
    use super::*;

    #[test]
    fn full_envelope_resolves_method_path_query_and_body() {
        let invocation = Invocation::new(
            json!({
                "request": {
                    "method": "post",
                    "url": "http://front-door.internal/tessaro/users?summary=count",
                    "headers": {"content-type": "application/json"}
                }
            }),
            Some(json!(r#"{"email":"a@b.com"}"#)),
        );

        let req = invocation.normalize().unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/tessaro/users");
        assert_eq!(req.query.first("summary"), Some("count".to_string()));
        assert_eq!(req.body, json!({"email": "a@b.com"}));
    }

    #[test]
    fn plain_mapping_with_top_level_url_works() {
        let invocation = Invocation::new(json!({"url": "/tessaro/services"}), None);
        let req = invocation.normalize().unwrap();
        assert_eq!(req.path, "/tessaro/services");
        assert_eq!(req.body, json!({}));
    }

    #[test]
    fn tunneled_path_param_beats_everything() {
        let invocation = Invocation::new(
            json!({
                "request": {
                    "method": "GET",
                    "url": "/wrapper?__path=%2Ftessaro%2Fmetrics%2Fnumber%3Fkey%3Dlogins",
                    "headers": {"x-tessaro-path": "/tessaro/users"}
                }
            }),
            None,
        );
        let req = invocation.normalize().unwrap();
        assert_eq!(req.path, "/tessaro/metrics/number");
        assert_eq!(req.query.first("key"), Some("logins".to_string()));
    }

    #[test]
    fn header_tunnel_applies_without_the_param() {
        let invocation = Invocation::new(
            json!({
                "request": {
                    "method": "DELETE",
                    "path": "/wrapper",
                    "headers": {"X-Tessaro-Path": "/tessaro/sessions/abc"}
                }
            }),
            None,
        );
        let req = invocation.normalize().unwrap();
        assert_eq!(req.path, "/tessaro/sessions/abc");
        assert_eq!(
            Endpoint::resolve(&req.method, &req.path).unwrap(),
            Endpoint::DeleteSession("abc".to_string())
        );
    }

    #[test]
    fn malformed_body_is_a_400_with_detail() {
        let invocation = Invocation::new(json!({}), Some(json!("{not json")));
        let err = invocation.normalize().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.public_message().contains("Invalid JSON payload"));
    }
}

// Route resolution taxonomy
mod resolution_tests {
    use super::*;

    fn status_of(method: &str, path: &str) -> StatusCode {
        Endpoint::resolve(method, path).unwrap_err().status()
    }

    #[test]
    fn missing_prefix_and_short_paths_are_404() {
        assert_eq!(status_of("GET", "/"), StatusCode::NOT_FOUND);
        assert_eq!(status_of("GET", "/tessaro"), StatusCode::NOT_FOUND);
        assert_eq!(status_of("GET", "/nope/users"), StatusCode::NOT_FOUND);
    }

    #[test]
    fn every_resource_resolves_its_crud_routes() {
        assert_eq!(
            Endpoint::resolve("GET", "/tessaro/organizations").unwrap(),
            Endpoint::ListOrganizations
        );
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/organizations").unwrap(),
            Endpoint::CreateOrganization
        );
        assert_eq!(
            Endpoint::resolve("PUT", "/tessaro/services/svc-1").unwrap(),
            Endpoint::UpdateService("svc-1".to_string())
        );
        assert_eq!(
            Endpoint::resolve("DELETE", "/tessaro/organizations/org-1").unwrap(),
            Endpoint::DeleteOrganization("org-1".to_string())
        );
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/services/query").unwrap(),
            Endpoint::QueryServices
        );
        assert_eq!(
            Endpoint::resolve("POST", "/tessaro/user-credentials").unwrap(),
            Endpoint::UpsertCredential
        );
    }

    #[test]
    fn wrong_methods_are_405() {
        assert_eq!(status_of("DELETE", "/tessaro/users"), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(status_of("PATCH", "/tessaro/services"), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            status_of("GET", "/tessaro/user-credentials"),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            status_of("PATCH", "/tessaro/sessions/abc"),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn metrics_have_their_own_404_space() {
        let err = Endpoint::resolve("GET", "/tessaro/metrics/unknown").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Metric endpoint not found");
    }

    #[test]
    fn session_reads_without_a_hash_are_400() {
        let err = Endpoint::resolve("GET", "/tessaro/sessions").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

// Canonical request construction from HTTP-shaped parts
mod request_tests {
    use super::*;

    #[test]
    fn override_survives_via_plain_request_construction() {
        let query = Query::parse("__path=%2Ftessaro%2Fusers%3Femail%3Da%2540b.com");
        let req = ApiRequest::new("GET", "/", query, Headers::new(), json!({}));
        assert_eq!(req.path, "/tessaro/users");
        // %2540 -> %40 -> @ across the override decode and first().
        assert_eq!(req.query.first("email"), Some("a@b.com".to_string()));
    }

    #[test]
    fn method_is_uppercased_and_empty_path_roots() {
        let req = ApiRequest::new("delete", "", Query::new(), Headers::new(), json!({}));
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.path, "/");
    }
}

// Response formatting
mod response_tests {
    use super::*;

    #[test]
    fn tuple_contract_for_json_and_empty_responses() {
        let (body, status, headers) = ApiResponse::ok(&json!({"value": 1})).unwrap().into_parts();
        assert_eq!((status, body.as_str()), (200, r#"{"value":1}"#));
        assert_eq!(headers, vec![("content-type".to_string(), "application/json".to_string())]);

        let (body, status, headers) = ApiResponse::no_content().into_parts();
        assert_eq!(status, 204);
        assert!(body.is_empty() && headers.is_empty());
    }

    #[test]
    fn errors_become_message_bodies() {
        let response = ApiResponse::error(&ApiError::duplicate("user already exists"));
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.body().unwrap(), &json!({"message": "user already exists"}));
    }
}

// Full dispatch through the invocation entry. The driver connects
// lazily, so routes that fail before their first store call run against
// a handle with no live server behind it.
mod dispatch_tests {
    use super::*;
    use std::sync::Arc;

    use tessaro_platform::credential::api::CredentialsState;
    use tessaro_platform::gateway::dispatch_invocation;
    use tessaro_platform::metric::api::MetricsState;
    use tessaro_platform::organization::api::OrganizationsState;
    use tessaro_platform::service::api::ServicesState;
    use tessaro_platform::session::api::SessionsState;
    use tessaro_platform::user::api::UsersState;
    use tessaro_platform::{
        AppState, CredentialRepository, MetricRepository, OrganizationRepository, PasswordHasher,
        ServiceRepository, SessionRepository, UserRepository,
    };

    async fn offline_state() -> AppState {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .expect("URI parsing does not contact the server");
        let db = client.database("tessaro_gateway_tests");

        let user_repo = Arc::new(UserRepository::new(&db));
        let organization_repo = Arc::new(OrganizationRepository::new(&db));
        let service_repo = Arc::new(ServiceRepository::new(&db));

        AppState {
            users: UsersState {
                user_repo: user_repo.clone(),
                organization_repo: organization_repo.clone(),
            },
            organizations: OrganizationsState {
                organization_repo: organization_repo.clone(),
                user_repo,
                service_repo: service_repo.clone(),
            },
            services: ServicesState {
                service_repo,
                organization_repo,
            },
            metrics: MetricsState {
                metric_repo: Arc::new(MetricRepository::new(&db)),
            },
            sessions: SessionsState {
                session_repo: Arc::new(SessionRepository::new(&db)),
            },
            credentials: CredentialsState {
                credential_repo: Arc::new(CredentialRepository::new(&db)),
                password_hasher: Arc::new(PasswordHasher::default()),
            },
        }
    }

    #[tokio::test]
    async fn unknown_route_answers_404() {
        let state = offline_state().await;
        let invocation = Invocation::new(
            json!({"request": {"method": "GET", "path": "/tessaro/widgets"}}),
            None,
        );
        let response = dispatch_invocation(&state, &invocation).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().unwrap(), &json!({"message": "Not found"}));
    }

    #[tokio::test]
    async fn wrong_method_answers_405() {
        let state = offline_state().await;
        let invocation = Invocation::new(
            json!({"request": {"method": "GET", "path": "/tessaro/user-credentials"}}),
            None,
        );
        let response = dispatch_invocation(&state, &invocation).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_body_answers_400_before_any_store_call() {
        let state = offline_state().await;
        let invocation = Invocation::new(
            json!({"request": {"method": "POST", "path": "/tessaro/organizations"}}),
            Some(json!("{broken")),
        );
        let response = dispatch_invocation(&state, &invocation).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_metric_key_answers_400() {
        let state = offline_state().await;
        let invocation = Invocation::new(
            json!({"request": {"method": "POST", "path": "/tessaro/metrics/increment"}}),
            Some(json!({})),
        );
        let response = dispatch_invocation(&state, &invocation).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body().unwrap(), &json!({"message": "key is required"}));
    }
}

// Validation helpers surfaced through the public types
mod validation_tests {
    use super::*;

    #[test]
    fn role_enum_is_closed() {
        assert!(UserRole::parse(Some("admin")).is_ok());
        let err = UserRole::parse(Some("root")).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.public_message(),
            "role must be one of member, organization_admin, admin"
        );
    }
}

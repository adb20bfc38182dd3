//! Tessaro Server
//!
//! HTTP entry point for the admin API. Every request that is not a health
//! probe is adapted into the canonical gateway request and dispatched on
//! its path segments.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TESSARO_PORT` | `8080` | HTTP API port |
//! | `MONGO_HOSTS` | `mongo.dino.home` | MongoDB host list |
//! | `MONGO_DATABASE` | `tessaro` | MongoDB database name |
//! | `MONGO_AUTH_SOURCE` | `admin` | `authSource` connection option |
//! | `MONGO_OPTIONS` | - | Extra `k=v&k=v` connection options |
//! | `MONGO_INITDB_ROOT_USERNAME` | - | Store username (secret mount or env) |
//! | `MONGO_INITDB_ROOT_PASSWORD` | - | Store password (secret mount or env) |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | text | Set to `json` for JSON logs |

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Request, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use tessaro_common::env::{env_or, env_or_parse};
use tessaro_platform::credential::api::CredentialsState;
use tessaro_platform::metric::api::MetricsState;
use tessaro_platform::organization::api::OrganizationsState;
use tessaro_platform::service::api::ServicesState;
use tessaro_platform::session::api::SessionsState;
use tessaro_platform::shared::indexes::initialize_indexes;
use tessaro_platform::store::{self, StoreConfig};
use tessaro_platform::user::api::UsersState;
use tessaro_platform::{
    dispatch, ApiError, ApiRequest, AppState, CredentialRepository, MetricRepository,
    OrganizationRepository, PasswordHasher, ServiceRepository, SessionRepository, UserRepository,
};
use tessaro_secrets::SecretStore;

/// Request bodies larger than this are rejected while buffering.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    tessaro_common::logging::init_logging("tessaro-server");

    info!("Starting Tessaro Server");

    let port: u16 = env_or_parse("TESSARO_PORT", 8080);

    // Connect to MongoDB with secret-resolved credentials
    let secrets = SecretStore::mongodb_auth();
    let store_config = StoreConfig::from_env();
    let db = store::connect(&store_config, &secrets).await?;
    initialize_indexes(&db).await?;

    // Initialize repositories
    let user_repo = Arc::new(UserRepository::new(&db));
    let organization_repo = Arc::new(OrganizationRepository::new(&db));
    let service_repo = Arc::new(ServiceRepository::new(&db));
    let metric_repo = Arc::new(MetricRepository::new(&db));
    let session_repo = Arc::new(SessionRepository::new(&db));
    let credential_repo = Arc::new(CredentialRepository::new(&db));
    info!("Repositories initialized");

    // Build handler states
    let app_state = AppState {
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
        metrics: MetricsState { metric_repo },
        sessions: SessionsState { session_repo },
        credentials: CredentialsState {
            credential_repo,
            password_hasher: Arc::new(PasswordHasher::default()),
        },
    };

    let app = Router::new()
        .route("/healthz", get(health_handler))
        .fallback(gateway)
        .with_state(Arc::new(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("0.0.0.0:{}", port);
    info!("API server listening on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Tessaro Server shutdown complete");
    Ok(())
}

/// Adapt the HTTP request into the canonical gateway request and dispatch.
async fn gateway(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::validation("failed to read request body").into_response(),
    };

    match ApiRequest::from_http(&parts.method, &parts.uri, &parts.headers, &bytes) {
        Ok(req) => dispatch(&state, &req).await.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "database": env_or("MONGO_DATABASE", "tessaro"),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

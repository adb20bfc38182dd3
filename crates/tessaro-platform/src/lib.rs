//! Tessaro Platform
//!
//! Multi-tenant admin backend over a MongoDB document store:
//! - User, organization, and service management with membership validation
//! - Operational metrics (counters and timestamps) keyed by (key, kind)
//! - Session storage keyed by token hash
//! - User credential storage (salted PBKDF2 hashes)
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Stored document types
//! - `repository` - Data access
//! - `api` - Request handling and wire mapping
//!
//! The `gateway` module owns the request boundary: normalizing the
//! invocation envelope into one canonical request, dispatching on path
//! segments, and formatting responses.

// Core aggregates
pub mod credential;
pub mod metric;
pub mod organization;
pub mod service;
pub mod session;
pub mod user;

// Request boundary
pub mod gateway;

// Shared infrastructure
pub mod shared;
pub mod store;

// Re-export common types from shared
pub use shared::error::{ApiError, Result};

// Re-export the gateway surface
pub use gateway::dispatch::{dispatch, AppState};
pub use gateway::invocation::Invocation;
pub use gateway::request::ApiRequest;
pub use gateway::response::ApiResponse;

// Re-export main entity types for convenience
pub use credential::entity::UserCredential;
pub use metric::entity::{Metric, MetricKind};
pub use organization::entity::Organization;
pub use service::entity::Service;
pub use session::entity::Session;
pub use user::entity::{User, UserRole};

// Re-export repositories
pub use credential::repository::CredentialRepository;
pub use metric::repository::MetricRepository;
pub use organization::repository::OrganizationRepository;
pub use service::repository::ServiceRepository;
pub use session::repository::SessionRepository;
pub use user::repository::UserRepository;

// Re-export services
pub use credential::password::PasswordHasher;

//! Organization Aggregate
//!
//! Tenants of the platform; users and services reference organizations by
//! id.

pub mod api;
pub mod entity;
pub mod repository;

// Re-export main types
pub use api::{organizations_map, resolve_organization_ids, OrganizationResponse, OrganizationsState};
pub use entity::Organization;
pub use repository::OrganizationRepository;

//! User Aggregate
//!
//! Admin-surface users. Visibility everywhere requires membership in at
//! least one organization.

pub mod api;
pub mod entity;
pub mod repository;

// Re-export main types
pub use api::{UserResponse, UsersState};
pub use entity::{User, UserRole};
pub use repository::UserRepository;

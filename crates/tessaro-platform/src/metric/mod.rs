//! Metric Aggregate
//!
//! Operational counters and timestamp markers, multiplexed in one
//! collection and keyed by (key, kind).

pub mod api;
pub mod entity;
pub mod repository;

// Re-export main types
pub use api::MetricsState;
pub use entity::{Metric, MetricKind, MetricValue};
pub use repository::MetricRepository;

//! Gateway Module
//!
//! The request boundary: every entry shape (plain HTTP, function-runtime
//! invocation envelope) is normalized into one canonical [`ApiRequest`]
//! here, dispatched on path segments, and answered with an
//! [`ApiResponse`]. Handlers never see the raw invocation.

pub mod dispatch;
pub mod invocation;
pub mod request;
pub mod response;

pub use dispatch::{dispatch, dispatch_invocation, AppState, Endpoint};
pub use invocation::Invocation;
pub use request::{ApiRequest, Headers, Query};
pub use response::ApiResponse;

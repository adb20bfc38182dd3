//! Tessaro shared infrastructure.
//!
//! Cross-cutting pieces used by every binary: logging bootstrap and
//! environment-variable helpers.

pub mod env;
pub mod logging;

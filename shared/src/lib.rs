//! Shared types for the storefront services
//!
//! Domain models, the unified error system, and the promotional price
//! resolver used by both the storefront pages and payment settlement.

pub mod error;
pub mod models;
pub mod pricing;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

//! HTTP API server for tagrank.
//!
//! This crate provides the HTTP surface over the tag store:
//! - Paged, sorted reads of the stored tag batch
//! - On-demand refresh from the remote tag source
//! - Health and Prometheus metrics endpoints

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod settings;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

//! HTTP API module for the SPM threshold engine.
//!
//! This module provides the REST API endpoints for calculating thresholds,
//! comparing them across cost levels, and reading the reference tables.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CompareRequest, ThresholdRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

//! Request types for the SPM threshold API.
//!
//! This module defines the JSON request structures for the `/threshold` and
//! `/compare` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::GeoSelection;

/// Request body for the `/threshold` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRequest {
    /// The threshold year.
    pub year: i32,
    /// The household's housing tenure, as a key or label.
    ///
    /// Parsed by the handler so an unknown value is reported as invalid
    /// input rather than malformed JSON.
    pub tenure: String,
    /// Number of people 18 or older.
    pub num_adults: u32,
    /// Number of people under 18.
    pub num_children: u32,
    /// How the geographic adjustment is chosen; national average if omitted.
    #[serde(default)]
    pub location: GeoSelection,
}

/// Request body for the `/compare` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The threshold year.
    pub year: i32,
    /// Number of people 18 or older.
    pub num_adults: u32,
    /// Number of people under 18.
    pub num_children: u32,
}

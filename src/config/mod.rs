//! Configuration loading and management for the SPM threshold engine.
//!
//! This module provides functionality to load the reference tables (base
//! thresholds, inflation projections, cost-level presets and state
//! adjustments) from YAML files or from the copies embedded in the crate.
//!
//! # Example
//!
//! ```no_run
//! use spm_threshold::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/spm").unwrap();
//! println!("Latest published year: {}", config.config().latest_published_year());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CostLevel, CostLevelsConfig, ForecastConfig, SpmConfig, StateGeoAdjustment, StatesConfig,
    ThresholdRow, ThresholdsConfig,
};

//! Calculation logic for the SPM threshold engine.
//!
//! This module contains all the calculation functions for determining an SPM
//! threshold, including base threshold lookup, forecasting past the last
//! published year, the three-parameter equivalence scale, geographic
//! adjustment resolution, the threshold product itself, and the
//! tenure-by-location comparison grid.

mod base_threshold;
mod comparison;
mod equivalence_scale;
mod forecast;
mod geoadj;
mod threshold;

pub use base_threshold::{BaseThresholdLookupResult, base_threshold, lookup_base_threshold};
pub use comparison::{COMPARISON_COLUMNS, compare_thresholds};
pub use equivalence_scale::{
    EquivalenceScaleResult, additional_adult_weight, calculate_equivalence_scale, child_weight,
    equivalence_scale, first_adult_weight, reference_family_scale, scale_breakdown,
};
pub use forecast::{apply_forecast, forecast_factor};
pub use geoadj::{
    GeoAdjustmentResult, ResolvedLocation, housing_share, is_typical_geoadj, non_housing_share,
    record_geoadj, resolve_geoadj, resolve_location,
};
pub use threshold::{ENGINE_VERSION, calculate_threshold, calculate_threshold_at, compute_threshold};

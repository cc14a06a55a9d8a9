//! Static data export for the web front-end.
//!
//! The front-end loads the reference tables as JSON instead of calling the
//! engine. Field names and nesting of these documents are a fixed contract
//! with that front-end.

mod document;
mod writer;

pub use document::{
    CostLevelEntry, EquivalenceScaleMethodology, ForecastSection, GeoadjFormula, Methodology,
    ProjectedRate, SpmDataDocument, StateEntry, ThresholdAmounts,
};
pub use writer::{
    BASE_THRESHOLDS_FILE, COST_LEVELS_FILE, DEFAULT_OUTPUT_DIR, SPM_CONFIG_FILE, STATE_GEOADJ_FILE,
    write_data_files,
};

//! Core data models for the SPM threshold engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod household;
mod location;
mod tenure;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, BaseThresholdSource, ComparisonGrid, ComparisonLocation,
    ComparisonRow, EquivalenceScaleBreakdown, ThresholdResult,
};
pub use household::HouseholdInput;
pub use location::GeoSelection;
pub use tenure::Tenure;

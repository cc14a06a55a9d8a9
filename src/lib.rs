//! Supplemental Poverty Measure threshold engine
//!
//! This crate computes SPM poverty thresholds from the BLS base thresholds,
//! the three-parameter equivalence scale, and a geographic adjustment.
//! Years past the last publication are forecast with projected inflation.
//! It also serves the calculation over HTTP and exports the reference tables
//! as JSON for the front-end.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;

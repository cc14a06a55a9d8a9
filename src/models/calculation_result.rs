//! Calculation result models for the SPM threshold engine.
//!
//! This module contains the [`ThresholdResult`] type and its associated structures
//! that capture all outputs from a threshold calculation, including the base
//! threshold source, the equivalence scale breakdown, and an audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HouseholdInput, Tenure};

/// Where a base threshold came from.
///
/// # Example
///
/// ```
/// use spm_threshold::models::BaseThresholdSource;
///
/// let source = BaseThresholdSource::Forecast;
/// assert_eq!(serde_json::to_string(&source).unwrap(), "\"forecast\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseThresholdSource {
    /// Taken directly from the published BLS table.
    Published,
    /// Extrapolated from the last published year with projected inflation.
    Forecast,
}

/// The pieces of the three-parameter equivalence scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceScaleBreakdown {
    /// Contribution of the adults (1.0 for the first, 0.5 for each other).
    pub adult_component: Decimal,
    /// Contribution of the children (0.3 each).
    pub child_component: Decimal,
    /// Sum of the two components.
    pub raw_scale: Decimal,
    /// Raw scale of the reference family.
    pub reference_scale: Decimal,
    /// Raw scale divided by the reference scale.
    pub scale: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag inputs that are accepted but unusual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use spm_threshold::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a threshold calculation.
///
/// Mirrors the four steps a reader follows by hand: base threshold,
/// equivalence scale, geographic adjustment, final product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The household the threshold was computed for.
    pub household: HouseholdInput,
    /// Base threshold for the reference family at this year and tenure.
    pub base_threshold: Decimal,
    /// Whether the base threshold was published or forecast.
    pub base_source: BaseThresholdSource,
    /// Cumulative inflation factor applied to the last published value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub forecast_factor: Option<Decimal>,
    /// The equivalence scale and its components.
    pub equivalence_scale: EquivalenceScaleBreakdown,
    /// The annual SPM threshold.
    pub threshold: Decimal,
    /// The annual threshold divided by twelve.
    pub monthly_threshold: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// A column of the comparison grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonLocation {
    /// Column heading (e.g. "Low-cost").
    pub label: String,
    /// The GEOADJ used for the column.
    pub geoadj: Decimal,
}

/// A row of the comparison grid: one tenure across every location column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// The tenure of this row.
    pub tenure: Tenure,
    /// Thresholds in the same order as [`ComparisonGrid::locations`].
    pub thresholds: Vec<Decimal>,
}

/// Thresholds for one household composition across tenures and locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonGrid {
    /// The threshold year.
    pub year: i32,
    /// Number of adults.
    pub num_adults: u32,
    /// Number of children.
    pub num_children: u32,
    /// The equivalence scale shared by every cell.
    pub equivalence_scale: Decimal,
    /// Column definitions.
    pub locations: Vec<ComparisonLocation>,
    /// One row per tenure.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonGrid {
    /// Returns the threshold for a tenure and location label, if present.
    pub fn get(&self, tenure: Tenure, location: &str) -> Option<Decimal> {
        let column = self.locations.iter().position(|l| l.label == location)?;
        self.rows
            .iter()
            .find(|row| row.tenure == tenure)
            .and_then(|row| row.thresholds.get(column).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Helper function to create Decimal values from strings
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result() -> ThresholdResult {
        ThresholdResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            household: HouseholdInput {
                year: 2024,
                tenure: Tenure::Renter,
                num_adults: 2,
                num_children: 2,
                geoadj: dec("1.00"),
            },
            base_threshold: dec("39430"),
            base_source: BaseThresholdSource::Published,
            forecast_factor: None,
            equivalence_scale: EquivalenceScaleBreakdown {
                adult_component: dec("1.5"),
                child_component: dec("0.6"),
                raw_scale: dec("2.1"),
                reference_scale: dec("2.1"),
                scale: dec("1"),
            },
            threshold: dec("39430"),
            monthly_threshold: dec("3285.83"),
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 5,
            },
        }
    }

    #[test]
    fn test_threshold_result_serializes_decimals_as_strings() {
        let result = create_sample_result();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["base_threshold"], "39430");
        assert_eq!(json["base_source"], "published");
        assert_eq!(json["household"]["tenure"], "renter");
        assert_eq!(json["equivalence_scale"]["raw_scale"], "2.1");
    }

    #[test]
    fn test_forecast_factor_omitted_when_published() {
        let result = create_sample_result();
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("forecast_factor"));
    }

    #[test]
    fn test_threshold_result_round_trip() {
        let mut result = create_sample_result();
        result.forecast_factor = Some(dec("1.025"));
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ThresholdResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_comparison_grid_lookup() {
        let grid = ComparisonGrid {
            year: 2024,
            num_adults: 2,
            num_children: 2,
            equivalence_scale: dec("1"),
            locations: vec![
                ComparisonLocation {
                    label: "Low-cost".to_string(),
                    geoadj: dec("0.84"),
                },
                ComparisonLocation {
                    label: "Average".to_string(),
                    geoadj: dec("1.00"),
                },
            ],
            rows: vec![ComparisonRow {
                tenure: Tenure::Renter,
                thresholds: vec![dec("33121.20"), dec("39430.00")],
            }],
        };

        assert_eq!(grid.get(Tenure::Renter, "Average"), Some(dec("39430.00")));
        assert_eq!(grid.get(Tenure::Renter, "High-cost"), None);
        assert_eq!(grid.get(Tenure::OwnerWithMortgage, "Average"), None);
    }
}

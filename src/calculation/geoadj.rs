//! Geographic adjustment resolution.
//!
//! GEOADJ is always an input to the engine: a preset, a state value, or a
//! number the caller supplies. The published derivation
//! `local_rent / national_rent x 0.492 + 0.508` is exported as methodology
//! only and never evaluated here.

use rust_decimal::Decimal;

use crate::config::SpmConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, GeoSelection};

/// Housing share of the renter threshold in the GEOADJ formula.
pub fn housing_share() -> Decimal {
    Decimal::new(492, 3)
}

/// Non-housing share of the renter threshold in the GEOADJ formula.
pub fn non_housing_share() -> Decimal {
    Decimal::new(508, 3)
}

/// Lower end of the range of published GEOADJ values.
pub fn typical_geoadj_min() -> Decimal {
    Decimal::new(70, 2)
}

/// Upper end of the range of published GEOADJ values.
pub fn typical_geoadj_max() -> Decimal {
    Decimal::new(150, 2)
}

/// A resolved geographic adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// The factor to apply.
    pub geoadj: Decimal,
    /// Display label for the location.
    pub label: String,
}

/// The result of resolving a location, including the audit step.
#[derive(Debug, Clone)]
pub struct GeoAdjustmentResult {
    /// The resolved location.
    pub location: ResolvedLocation,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Returns the GEOADJ factor for a selection.
///
/// Cost-level keys are looked up in the presets and state codes in the state
/// table; a custom value is returned as is, without range checks.
///
/// # Errors
///
/// Returns `UnknownLocation` if a key or code is not in its table.
///
/// # Examples
///
/// ```
/// use spm_threshold::calculation::resolve_geoadj;
/// use spm_threshold::config::ConfigLoader;
/// use spm_threshold::models::GeoSelection;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded()?;
/// let selection = GeoSelection::State { code: "WV".to_string() };
/// assert_eq!(resolve_geoadj(&selection, loader.config())?, Decimal::new(84, 2));
/// # Ok::<(), spm_threshold::error::EngineError>(())
/// ```
pub fn resolve_geoadj(selection: &GeoSelection, config: &SpmConfig) -> EngineResult<Decimal> {
    resolve_location(selection, config).map(|location| location.geoadj)
}

/// Resolves a selection to its factor and display label.
pub fn resolve_location(
    selection: &GeoSelection,
    config: &SpmConfig,
) -> EngineResult<ResolvedLocation> {
    Ok(match selection {
        GeoSelection::CostLevel { key } => {
            let level = config.cost_level(key)?;
            ResolvedLocation {
                geoadj: level.geoadj,
                label: level.label.clone(),
            }
        }
        GeoSelection::State { code } => {
            let state = config.state(code)?;
            ResolvedLocation {
                geoadj: state.geoadj,
                label: state.name.clone(),
            }
        }
        GeoSelection::Custom { geoadj } => ResolvedLocation {
            geoadj: *geoadj,
            label: "Custom".to_string(),
        },
    })
}

/// Records the geographic adjustment applied to a household.
///
/// # Arguments
///
/// * `location` - The resolved location
/// * `step_number` - The step number for audit trail sequencing
pub fn record_geoadj(location: &ResolvedLocation, step_number: u32) -> GeoAdjustmentResult {
    let comparison = if location.geoadj > Decimal::ONE {
        "above-average"
    } else if location.geoadj < Decimal::ONE {
        "below-average"
    } else {
        "average"
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "geographic_adjustment".to_string(),
        rule_name: "Geographic Adjustment".to_string(),
        input: serde_json::json!({
            "location": location.label
        }),
        output: serde_json::json!({
            "geoadj": location.geoadj.to_string()
        }),
        reasoning: format!(
            "{} GEOADJ {} ({}-cost area)",
            location.label, location.geoadj, comparison
        ),
    };

    GeoAdjustmentResult {
        location: location.clone(),
        audit_step,
    }
}

/// Returns true if a factor lies inside the range of published GEOADJ values.
pub fn is_typical_geoadj(geoadj: Decimal) -> bool {
    geoadj >= typical_geoadj_min() && geoadj <= typical_geoadj_max()
}

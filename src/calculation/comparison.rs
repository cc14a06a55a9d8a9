//! Threshold comparison across tenures and locations.
//!
//! For a fixed household composition, shows what the threshold would be for
//! every tenure in a low-cost, an average and a high-cost area.

use crate::config::SpmConfig;
use crate::error::EngineResult;
use crate::models::{ComparisonGrid, ComparisonLocation, ComparisonRow, Tenure};

use super::base_threshold::base_threshold;
use super::equivalence_scale::equivalence_scale;
use super::threshold::multiply;

/// Cost-level presets used as comparison columns, with their headings.
pub const COMPARISON_COLUMNS: [(&str, &str); 3] = [
    ("low_cost", "Low-cost"),
    ("national_average", "Average"),
    ("high_cost", "High-cost"),
];

/// Builds the comparison grid for a household composition.
///
/// # Errors
///
/// Returns `InvalidInput` for an unsupported year, and `UnknownLocation` if
/// a comparison preset is missing from the configuration.
///
/// # Examples
///
/// ```
/// use spm_threshold::calculation::compare_thresholds;
/// use spm_threshold::config::ConfigLoader;
/// use spm_threshold::models::Tenure;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded()?;
/// let grid = compare_thresholds(2024, 2, 2, loader.config())?;
/// assert_eq!(grid.get(Tenure::Renter, "Average"), Some(Decimal::from(39430)));
/// # Ok::<(), spm_threshold::error::EngineError>(())
/// ```
pub fn compare_thresholds(
    year: i32,
    num_adults: u32,
    num_children: u32,
    config: &SpmConfig,
) -> EngineResult<ComparisonGrid> {
    let scale = equivalence_scale(num_adults, num_children);

    let locations = COMPARISON_COLUMNS
        .iter()
        .map(|(key, heading)| {
            config.cost_level(key).map(|level| ComparisonLocation {
                label: heading.to_string(),
                geoadj: level.geoadj,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(Tenure::ALL.len());
    for tenure in Tenure::ALL {
        let base = base_threshold(year, tenure, config)?;
        let thresholds = locations
            .iter()
            .map(|location| multiply(base, scale, location.geoadj))
            .collect::<EngineResult<Vec<_>>>()?;
        rows.push(ComparisonRow { tenure, thresholds });
    }

    Ok(ComparisonGrid {
        year,
        num_adults,
        num_children,
        equivalence_scale: scale,
        locations,
        rows,
    })
}

//! Geographic adjustment selection.
//!
//! A household's GEOADJ is either picked from the cost-level presets, taken
//! from a state's reference value, or supplied directly.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How the caller chose a geographic adjustment.
///
/// # Example
///
/// ```
/// use spm_threshold::models::GeoSelection;
///
/// let selection: GeoSelection = serde_json::from_str(
///     r#"{"type": "state", "code": "WV"}"#,
/// ).unwrap();
/// assert_eq!(selection, GeoSelection::State { code: "WV".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeoSelection {
    /// A named cost-level preset (e.g. "low_cost").
    CostLevel {
        /// The preset key.
        key: String,
    },
    /// A two-letter state or district code (e.g. "HI").
    State {
        /// The region code.
        code: String,
    },
    /// An explicit GEOADJ value.
    Custom {
        /// The factor to apply.
        geoadj: Decimal,
    },
}

impl Default for GeoSelection {
    fn default() -> Self {
        GeoSelection::CostLevel {
            key: "national_average".to_string(),
        }
    }
}

impl FromStr for GeoSelection {
    type Err = EngineError;

    /// Parses the command-line form of a selection.
    ///
    /// `custom:<factor>` gives a custom value, a two-letter alphabetic string
    /// is a state code, and anything else is a cost-level key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(value) = s.strip_prefix("custom:") {
            let geoadj = Decimal::from_str(value.trim()).map_err(|e| EngineError::InvalidInput {
                field: "geoadj".to_string(),
                message: format!("'{}' is not a number: {}", value, e),
            })?;
            return Ok(GeoSelection::Custom { geoadj });
        }

        if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(GeoSelection::State {
                code: s.to_ascii_uppercase(),
            });
        }

        Ok(GeoSelection::CostLevel { key: s.to_string() })
    }
}

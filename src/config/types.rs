//! Configuration types for threshold calculation.
//!
//! This module contains the strongly-typed reference tables that are
//! deserialized from YAML configuration files.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Tenure;

/// Published base thresholds for one year, one value per tenure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRow {
    /// Base threshold for renters.
    pub renter: Decimal,
    /// Base threshold for owners with a mortgage.
    pub owner_with_mortgage: Decimal,
    /// Base threshold for owners without a mortgage.
    pub owner_without_mortgage: Decimal,
}

impl ThresholdRow {
    /// Returns the value for a tenure.
    pub fn get(&self, tenure: Tenure) -> Decimal {
        match tenure {
            Tenure::Renter => self.renter,
            Tenure::OwnerWithMortgage => self.owner_with_mortgage,
            Tenure::OwnerWithoutMortgage => self.owner_without_mortgage,
        }
    }
}

/// Base threshold table from thresholds.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    /// URL of the published figures.
    pub source_url: String,
    /// Map of year to base thresholds.
    pub years: BTreeMap<i32, ThresholdRow>,
}

/// Inflation projections from forecast.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Rate used for any year without a projection.
    pub default_inflation: Decimal,
    /// Map of year to projected annual inflation.
    #[serde(default)]
    pub cpi_projections: BTreeMap<i32, Decimal>,
}

impl ForecastConfig {
    /// Returns the projected rate for a year, or the default rate.
    pub fn rate(&self, year: i32) -> Decimal {
        self.cpi_projections
            .get(&year)
            .copied()
            .unwrap_or(self.default_inflation)
    }
}

/// A named cost-of-living preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLevel {
    /// The geographic adjustment factor.
    pub geoadj: Decimal,
    /// Display label.
    pub label: String,
}

/// Cost-level presets from cost_levels.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct CostLevelsConfig {
    /// Map of preset key to preset.
    pub cost_levels: IndexMap<String, CostLevel>,
}

/// Geographic adjustment for a state or district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGeoAdjustment {
    /// Display name.
    pub name: String,
    /// The geographic adjustment factor.
    pub geoadj: Decimal,
}

/// State adjustments from states.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StatesConfig {
    /// Map of two-letter code to adjustment.
    pub states: IndexMap<String, StateGeoAdjustment>,
}

/// The complete set of reference tables.
///
/// Built once at startup and read-only afterwards. Construction validates
/// the invariants the calculations rely on, so lookups never have to.
#[derive(Debug, Clone)]
pub struct SpmConfig {
    source_url: String,
    thresholds: BTreeMap<i32, ThresholdRow>,
    forecast: ForecastConfig,
    cost_levels: IndexMap<String, CostLevel>,
    states: IndexMap<String, StateGeoAdjustment>,
}

impl SpmConfig {
    /// Creates a new SpmConfig from its component parts.
    ///
    /// State codes are normalized to upper case.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if:
    /// - there are no published years
    /// - any base threshold or geoadj is not positive
    /// - a projection year is not after the last published year
    /// - any inflation rate is not positive
    /// - a state code is not two ASCII letters
    pub fn new(
        thresholds: ThresholdsConfig,
        forecast: ForecastConfig,
        cost_levels: CostLevelsConfig,
        states: StatesConfig,
    ) -> EngineResult<Self> {
        let latest = match thresholds.years.keys().next_back() {
            Some(year) => *year,
            None => {
                return Err(invalid("thresholds.years has no published years"));
            }
        };

        for (year, row) in &thresholds.years {
            for tenure in Tenure::ALL {
                if row.get(tenure) <= Decimal::ZERO {
                    return Err(invalid(format!(
                        "base threshold for {} {} must be positive",
                        year, tenure
                    )));
                }
            }
        }

        if forecast.default_inflation <= Decimal::ZERO {
            return Err(invalid("default_inflation must be positive"));
        }
        for (year, rate) in &forecast.cpi_projections {
            if *year <= latest {
                return Err(invalid(format!(
                    "cpi projection for {} is not after the last published year {}",
                    year, latest
                )));
            }
            if *rate <= Decimal::ZERO {
                return Err(invalid(format!("cpi projection for {} must be positive", year)));
            }
        }

        for (key, level) in &cost_levels.cost_levels {
            if level.geoadj <= Decimal::ZERO {
                return Err(invalid(format!("cost level '{}' geoadj must be positive", key)));
            }
        }

        let mut normalized_states = IndexMap::with_capacity(states.states.len());
        for (code, state) in states.states {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(invalid(format!("state code '{}' must be two letters", code)));
            }
            if state.geoadj <= Decimal::ZERO {
                return Err(invalid(format!("state '{}' geoadj must be positive", code)));
            }
            normalized_states.insert(code.to_ascii_uppercase(), state);
        }

        Ok(Self {
            source_url: thresholds.source_url,
            thresholds: thresholds.years,
            forecast,
            cost_levels: cost_levels.cost_levels,
            states: normalized_states,
        })
    }

    /// Returns the URL of the published thresholds.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Returns all published base thresholds, keyed by year.
    pub fn thresholds(&self) -> &BTreeMap<i32, ThresholdRow> {
        &self.thresholds
    }

    /// Returns the published row for a year, if there is one.
    pub fn published(&self, year: i32) -> Option<&ThresholdRow> {
        self.thresholds.get(&year)
    }

    /// Returns the earliest published year.
    pub fn earliest_published_year(&self) -> i32 {
        // Non-empty by construction.
        self.thresholds.keys().next().copied().unwrap_or_default()
    }

    /// Returns the latest published year.
    pub fn latest_published_year(&self) -> i32 {
        self.thresholds.keys().next_back().copied().unwrap_or_default()
    }

    /// Returns the inflation projections.
    pub fn forecast(&self) -> &ForecastConfig {
        &self.forecast
    }

    /// Returns all cost-level presets.
    pub fn cost_levels(&self) -> &IndexMap<String, CostLevel> {
        &self.cost_levels
    }

    /// Returns all state adjustments.
    pub fn states(&self) -> &IndexMap<String, StateGeoAdjustment> {
        &self.states
    }

    /// Gets a cost-level preset by its key.
    ///
    /// Returns `UnknownLocation` if the key is not a preset.
    pub fn cost_level(&self, key: &str) -> EngineResult<&CostLevel> {
        self.cost_levels
            .get(key)
            .ok_or_else(|| EngineError::UnknownLocation {
                kind: "cost level".to_string(),
                key: key.to_string(),
            })
    }

    /// Gets a state adjustment by its two-letter code, ignoring case.
    ///
    /// Returns `UnknownLocation` if the code is not in the table.
    pub fn state(&self, code: &str) -> EngineResult<&StateGeoAdjustment> {
        self.states
            .get(&code.trim().to_ascii_uppercase())
            .ok_or_else(|| EngineError::UnknownLocation {
                kind: "state".to_string(),
                key: code.to_string(),
            })
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(renter: &str, with: &str, without: &str) -> ThresholdRow {
        ThresholdRow {
            renter: dec(renter),
            owner_with_mortgage: dec(with),
            owner_without_mortgage: dec(without),
        }
    }

    fn thresholds() -> ThresholdsConfig {
        ThresholdsConfig {
            source_url: "https://example.com".to_string(),
            years: BTreeMap::from([
                (2023, row("36606", "36192", "30347")),
                (2024, row("39430", "39068", "32586")),
            ]),
        }
    }

    fn forecast() -> ForecastConfig {
        ForecastConfig {
            default_inflation: dec("0.02"),
            cpi_projections: BTreeMap::from([(2025, dec("0.025"))]),
        }
    }

    fn cost_levels() -> CostLevelsConfig {
        CostLevelsConfig {
            cost_levels: IndexMap::from([(
                "national_average".to_string(),
                CostLevel {
                    geoadj: dec("1.00"),
                    label: "National average".to_string(),
                },
            )]),
        }
    }

    fn states() -> StatesConfig {
        StatesConfig {
            states: IndexMap::from([(
                "wv".to_string(),
                StateGeoAdjustment {
                    name: "West Virginia".to_string(),
                    geoadj: dec("0.84"),
                },
            )]),
        }
    }

    #[test]
    fn test_threshold_row_get() {
        let row = row("1", "2", "3");
        assert_eq!(row.get(Tenure::Renter), dec("1"));
        assert_eq!(row.get(Tenure::OwnerWithMortgage), dec("2"));
        assert_eq!(row.get(Tenure::OwnerWithoutMortgage), dec("3"));
    }

    #[test]
    fn test_forecast_rate_falls_back_to_default() {
        let forecast = forecast();
        assert_eq!(forecast.rate(2025), dec("0.025"));
        assert_eq!(forecast.rate(2040), dec("0.02"));
    }

    #[test]
    fn test_new_computes_year_range_and_normalizes_state_codes() {
        let config = SpmConfig::new(thresholds(), forecast(), cost_levels(), states()).unwrap();
        assert_eq!(config.earliest_published_year(), 2023);
        assert_eq!(config.latest_published_year(), 2024);
        assert!(config.states().contains_key("WV"));
        assert!(config.published(2022).is_none());
    }

    #[test]
    fn test_new_rejects_empty_thresholds() {
        let mut empty = thresholds();
        empty.years.clear();
        let result = SpmConfig::new(empty, forecast(), cost_levels(), states());
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_rejects_projection_inside_published_range() {
        let mut bad = forecast();
        bad.cpi_projections.insert(2024, dec("0.03"));
        match SpmConfig::new(thresholds(), bad, cost_levels(), states()) {
            Err(EngineError::InvalidConfig { message }) => assert!(message.contains("2024")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_non_positive_rates() {
        let mut zero_default = forecast();
        zero_default.default_inflation = Decimal::ZERO;
        match SpmConfig::new(thresholds(), zero_default, cost_levels(), states()) {
            Err(EngineError::InvalidConfig { message }) => {
                assert!(message.contains("default_inflation"))
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        let mut deflation = forecast();
        deflation.cpi_projections.insert(2026, dec("-0.5"));
        match SpmConfig::new(thresholds(), deflation, cost_levels(), states()) {
            Err(EngineError::InvalidConfig { message }) => assert!(message.contains("2026")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_new_preserves_table_order() {
        let mut levels = cost_levels();
        levels.cost_levels.insert(
            "low_cost".to_string(),
            CostLevel {
                geoadj: dec("0.84"),
                label: "Low-cost".to_string(),
            },
        );
        let mut more_states = states();
        more_states.states.insert(
            "al".to_string(),
            StateGeoAdjustment {
                name: "Alabama".to_string(),
                geoadj: dec("0.86"),
            },
        );

        let config = SpmConfig::new(thresholds(), forecast(), levels, more_states).unwrap();
        let level_keys: Vec<&str> = config.cost_levels().keys().map(String::as_str).collect();
        let state_keys: Vec<&str> = config.states().keys().map(String::as_str).collect();
        assert_eq!(level_keys, ["national_average", "low_cost"]);
        assert_eq!(state_keys, ["WV", "AL"]);
    }

    #[test]
    fn test_new_rejects_non_positive_threshold() {
        let mut bad = thresholds();
        bad.years.insert(2022, row("0", "1", "1"));
        let result = SpmConfig::new(bad, forecast(), cost_levels(), states());
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_rejects_bad_state_code() {
        let mut bad = states();
        bad.states.insert(
            "WVA".to_string(),
            StateGeoAdjustment {
                name: "Typo".to_string(),
                geoadj: dec("1"),
            },
        );
        let result = SpmConfig::new(thresholds(), forecast(), cost_levels(), bad);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_rejects_non_positive_geoadj() {
        let mut bad = cost_levels();
        bad.cost_levels.insert(
            "free".to_string(),
            CostLevel {
                geoadj: dec("0"),
                label: "Free".to_string(),
            },
        );
        let result = SpmConfig::new(thresholds(), forecast(), bad, states());
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }
}

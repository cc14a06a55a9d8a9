//! Serializable export documents.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::calculation::{
    additional_adult_weight, child_weight, first_adult_weight, housing_share, non_housing_share,
    reference_family_scale,
};
use crate::config::{SpmConfig, ThresholdRow};
use crate::error::{EngineError, EngineResult};
use crate::models::Tenure;

/// Base thresholds for one year as whole dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdAmounts {
    /// Renter base threshold.
    pub renter: i64,
    /// Owner with mortgage base threshold.
    pub owner_with_mortgage: i64,
    /// Owner without mortgage base threshold.
    pub owner_without_mortgage: i64,
}

impl ThresholdAmounts {
    fn from_row(year: i32, row: &ThresholdRow) -> EngineResult<Self> {
        let whole = |tenure: Tenure| {
            row.get(tenure)
                .round()
                .to_i64()
                .ok_or_else(|| EngineError::InvalidConfig {
                    message: format!("{} {} base threshold is out of range", year, tenure),
                })
        };
        Ok(Self {
            renter: whole(Tenure::Renter)?,
            owner_with_mortgage: whole(Tenure::OwnerWithMortgage)?,
            owner_without_mortgage: whole(Tenure::OwnerWithoutMortgage)?,
        })
    }
}

/// A state's entry in `state_geoadj.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateEntry {
    /// Display name.
    pub name: String,
    /// Geographic adjustment factor.
    #[serde(with = "rust_decimal::serde::float")]
    pub geoadj: Decimal,
}

/// A preset's entry in `cost_levels.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostLevelEntry {
    /// Geographic adjustment factor.
    #[serde(with = "rust_decimal::serde::float")]
    pub geoadj: Decimal,
    /// Display label.
    pub label: String,
}

/// Equivalence scale parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalenceScaleMethodology {
    /// Weight of the first adult.
    #[serde(with = "rust_decimal::serde::float")]
    pub first_adult: Decimal,
    /// Weight of each further adult.
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_adults: Decimal,
    /// Weight of each child.
    #[serde(with = "rust_decimal::serde::float")]
    pub children: Decimal,
    /// Raw scale of the reference family.
    #[serde(with = "rust_decimal::serde::float")]
    pub reference_family: Decimal,
}

/// Shares in `GEOADJ = local_rent / national_rent x housingShare + nonHousingShare`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoadjFormula {
    /// Housing share of the renter threshold.
    #[serde(with = "rust_decimal::serde::float")]
    pub housing_share: Decimal,
    /// Everything else.
    #[serde(with = "rust_decimal::serde::float")]
    pub non_housing_share: Decimal,
}

/// Methodology section of `spm_config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Methodology {
    /// Equivalence scale parameters.
    pub equivalence_scale: EquivalenceScaleMethodology,
    /// GEOADJ formula parameters.
    pub geoadj_formula: GeoadjFormula,
}

/// An inflation rate serialized as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectedRate(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

/// Forecast section of `spm_config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSection {
    /// Last year with published thresholds.
    pub latest_published_year: i32,
    /// Projected inflation by year.
    pub cpi_projections: BTreeMap<String, ProjectedRate>,
    /// Rate for years without a projection.
    #[serde(with = "rust_decimal::serde::float")]
    pub default_inflation: Decimal,
}

/// The combined `spm_config.json` document.
///
/// # Example
///
/// ```
/// use spm_threshold::config::ConfigLoader;
/// use spm_threshold::export::SpmDataDocument;
///
/// let loader = ConfigLoader::embedded()?;
/// let document = SpmDataDocument::from_config(loader.config())?;
/// let json = serde_json::to_value(&document).unwrap();
/// assert_eq!(json["baseThresholds"]["2024"]["renter"], 39430);
/// assert_eq!(json["methodology"]["equivalenceScale"]["referenceFamily"], 2.1);
/// # Ok::<(), spm_threshold::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpmDataDocument {
    /// Base thresholds keyed by year string, newest first.
    pub base_thresholds: IndexMap<String, ThresholdAmounts>,
    /// State adjustments keyed by code, in table order.
    pub states: IndexMap<String, StateEntry>,
    /// Cost-level presets keyed by preset key, in table order.
    pub cost_levels: IndexMap<String, CostLevelEntry>,
    /// Calculation parameters.
    pub methodology: Methodology,
    /// Forecast parameters.
    pub forecast: ForecastSection,
}

impl SpmDataDocument {
    /// Builds the document from the reference tables.
    ///
    /// Returns `InvalidConfig` if a base threshold cannot be expressed in
    /// whole dollars.
    pub fn from_config(config: &SpmConfig) -> EngineResult<Self> {
        let base_thresholds = config
            .thresholds()
            .iter()
            .rev()
            .map(|(year, row)| {
                ThresholdAmounts::from_row(*year, row).map(|amounts| (year.to_string(), amounts))
            })
            .collect::<EngineResult<IndexMap<_, _>>>()?;

        let states = config
            .states()
            .iter()
            .map(|(code, state)| {
                (
                    code.clone(),
                    StateEntry {
                        name: state.name.clone(),
                        geoadj: state.geoadj,
                    },
                )
            })
            .collect();

        let cost_levels = config
            .cost_levels()
            .iter()
            .map(|(key, level)| {
                (
                    key.clone(),
                    CostLevelEntry {
                        geoadj: level.geoadj,
                        label: level.label.clone(),
                    },
                )
            })
            .collect();

        let forecast = ForecastSection {
            latest_published_year: config.latest_published_year(),
            cpi_projections: config
                .forecast()
                .cpi_projections
                .iter()
                .map(|(year, rate)| (year.to_string(), ProjectedRate(*rate)))
                .collect(),
            default_inflation: config.forecast().default_inflation,
        };

        Ok(Self {
            base_thresholds,
            states,
            cost_levels,
            methodology: Methodology {
                equivalence_scale: EquivalenceScaleMethodology {
                    first_adult: first_adult_weight(),
                    additional_adults: additional_adult_weight(),
                    children: child_weight(),
                    reference_family: reference_family_scale(),
                },
                geoadj_formula: GeoadjFormula {
                    housing_share: housing_share(),
                    non_housing_share: non_housing_share(),
                },
            },
            forecast,
        })
    }
}

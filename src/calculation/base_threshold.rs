//! Base threshold lookup functionality.
//!
//! This module provides functions for determining the reference-family base
//! threshold for a year and tenure, either from the published table or by
//! forecasting past the last published year.

use rust_decimal::Decimal;

use crate::config::SpmConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, BaseThresholdSource, Tenure};

use super::forecast::{apply_forecast, forecast_factor};

/// The result of a base threshold lookup, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct BaseThresholdLookupResult {
    /// The base threshold for the reference family.
    pub amount: Decimal,
    /// Whether the amount was published or forecast.
    pub source: BaseThresholdSource,
    /// The cumulative inflation factor, for forecast amounts.
    pub forecast_factor: Option<Decimal>,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Returns the base threshold for a year and tenure.
///
/// # Arguments
///
/// * `year` - The threshold year
/// * `tenure` - The housing tenure
/// * `config` - The reference tables
///
/// # Returns
///
/// Published years return the tabulated value unchanged. Years after the
/// last published year return a forecast rounded to whole dollars.
/// Returns `InvalidInput` if the year is before the earliest published year,
/// or falls in a gap of the published table.
///
/// # Examples
///
/// ```
/// use spm_threshold::calculation::base_threshold;
/// use spm_threshold::config::ConfigLoader;
/// use spm_threshold::models::Tenure;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded()?;
/// let amount = base_threshold(2024, Tenure::Renter, loader.config())?;
/// assert_eq!(amount, Decimal::from(39430));
/// # Ok::<(), spm_threshold::error::EngineError>(())
/// ```
pub fn base_threshold(year: i32, tenure: Tenure, config: &SpmConfig) -> EngineResult<Decimal> {
    lookup_base_threshold(year, tenure, config, 1).map(|result| result.amount)
}

/// Looks up the base threshold and records an audit step.
pub fn lookup_base_threshold(
    year: i32,
    tenure: Tenure,
    config: &SpmConfig,
    step_number: u32,
) -> EngineResult<BaseThresholdLookupResult> {
    let earliest = config.earliest_published_year();
    let latest = config.latest_published_year();

    if year < earliest {
        return Err(EngineError::InvalidInput {
            field: "year".to_string(),
            message: format!(
                "{} is before the earliest published year {}",
                year, earliest
            ),
        });
    }

    if let Some(row) = config.published(year) {
        let amount = row.get(tenure);
        let audit_step = AuditStep {
            step_number,
            rule_id: "base_threshold".to_string(),
            rule_name: "Base Threshold".to_string(),
            input: serde_json::json!({
                "year": year,
                "tenure": tenure.key()
            }),
            output: serde_json::json!({
                "base_threshold": amount.to_string(),
                "source": "published",
                "source_url": config.source_url()
            }),
            reasoning: format!(
                "Published {} base threshold for {}: ${}",
                year,
                tenure.label().to_lowercase(),
                amount
            ),
        };

        return Ok(BaseThresholdLookupResult {
            amount,
            source: BaseThresholdSource::Published,
            forecast_factor: None,
            audit_step,
        });
    }

    if year < latest {
        return Err(EngineError::InvalidInput {
            field: "year".to_string(),
            message: format!("no published thresholds for {}", year),
        });
    }

    // Past the last published year: carry the latest value forward.
    let latest_amount = config
        .published(latest)
        .map(|row| row.get(tenure))
        .ok_or_else(|| EngineError::InvalidConfig {
            message: format!("no published thresholds for {}", latest),
        })?;
    let factor = forecast_factor(latest, year, config.forecast())?;
    let amount = apply_forecast(latest_amount, factor)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_threshold".to_string(),
        rule_name: "Base Threshold".to_string(),
        input: serde_json::json!({
            "year": year,
            "tenure": tenure.key(),
            "latest_published_year": latest,
            "latest_published_amount": latest_amount.to_string()
        }),
        output: serde_json::json!({
            "base_threshold": amount.to_string(),
            "source": "forecast",
            "forecast_factor": factor.normalize().to_string()
        }),
        reasoning: format!(
            "Forecast from {} ${} x {} (projected inflation {}-{}) = ${}",
            latest,
            latest_amount,
            factor.round_dp(6).normalize(),
            latest + 1,
            year,
            amount
        ),
    };

    Ok(BaseThresholdLookupResult {
        amount,
        source: BaseThresholdSource::Forecast,
        forecast_factor: Some(factor),
        audit_step,
    })
}

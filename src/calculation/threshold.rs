//! Threshold calculation.
//!
//! The SPM threshold is the product of three factors:
//! `base_threshold x equivalence_scale x geoadj`. No rounding is applied to
//! the product.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::SpmConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, BaseThresholdSource, HouseholdInput, ThresholdResult,
    Tenure,
};

use super::base_threshold::{base_threshold, lookup_base_threshold};
use super::equivalence_scale::{calculate_equivalence_scale, equivalence_scale};
use super::geoadj::{ResolvedLocation, is_typical_geoadj, record_geoadj};

/// The version reported in every [`ThresholdResult`].
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Computes the SPM threshold for a household.
///
/// # Arguments
///
/// * `year` - The threshold year
/// * `tenure` - The housing tenure
/// * `num_adults` - Number of people 18 or older
/// * `num_children` - Number of people under 18
/// * `geoadj` - Geographic adjustment factor, used as given
/// * `config` - The reference tables
///
/// # Returns
///
/// The unrounded threshold. A household with no adults and no children
/// gets exactly zero. Errors from [`base_threshold`] are passed through.
///
/// # Examples
///
/// ```
/// use spm_threshold::calculation::compute_threshold;
/// use spm_threshold::config::ConfigLoader;
/// use spm_threshold::models::Tenure;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded()?;
/// let threshold = compute_threshold(2024, Tenure::Renter, 2, 2, Decimal::ONE, loader.config())?;
/// assert_eq!(threshold, Decimal::from(39430));
/// # Ok::<(), spm_threshold::error::EngineError>(())
/// ```
pub fn compute_threshold(
    year: i32,
    tenure: Tenure,
    num_adults: u32,
    num_children: u32,
    geoadj: Decimal,
    config: &SpmConfig,
) -> EngineResult<Decimal> {
    let base = base_threshold(year, tenure, config)?;
    let scale = equivalence_scale(num_adults, num_children);
    multiply(base, scale, geoadj)
}

/// Calculates the threshold for a household with a full breakdown.
///
/// The audit trace has four steps: base threshold, equivalence scale,
/// geographic adjustment, final product. Warnings flag an empty household,
/// a forecast base threshold, and a GEOADJ outside 0.70-1.50.
pub fn calculate_threshold(
    household: &HouseholdInput,
    config: &SpmConfig,
) -> EngineResult<ThresholdResult> {
    let location = ResolvedLocation {
        geoadj: household.geoadj,
        label: "Supplied".to_string(),
    };
    calculate_threshold_at(household, &location, config)
}

/// Calculates the threshold for a household at an already-resolved location.
///
/// `location.geoadj` takes precedence over `household.geoadj`.
pub fn calculate_threshold_at(
    household: &HouseholdInput,
    location: &ResolvedLocation,
    config: &SpmConfig,
) -> EngineResult<ThresholdResult> {
    let start_time = Instant::now();
    let mut household = household.clone();
    household.geoadj = location.geoadj;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let base = lookup_base_threshold(household.year, household.tenure, config, 1)?;
    steps.push(base.audit_step);
    if base.source == BaseThresholdSource::Forecast {
        warnings.push(AuditWarning {
            code: "FORECAST_BASE_THRESHOLD".to_string(),
            message: format!(
                "No published thresholds for {}; the base threshold is a forecast from {}",
                household.year,
                config.latest_published_year()
            ),
            severity: "low".to_string(),
        });
    }

    let scale = calculate_equivalence_scale(household.num_adults, household.num_children, 2);
    steps.push(scale.audit_step);
    if household.is_degenerate() {
        warnings.push(AuditWarning {
            code: "EMPTY_HOUSEHOLD".to_string(),
            message: "Household has no adults and no children; threshold is 0".to_string(),
            severity: "medium".to_string(),
        });
    }

    let geo = record_geoadj(location, 3);
    steps.push(geo.audit_step);
    if !is_typical_geoadj(location.geoadj) {
        warnings.push(AuditWarning {
            code: "GEOADJ_OUT_OF_RANGE".to_string(),
            message: format!(
                "GEOADJ {} is outside the published range 0.70-1.50",
                location.geoadj
            ),
            severity: "low".to_string(),
        });
    }

    let threshold = multiply(base.amount, scale.breakdown.scale, location.geoadj)?;
    let monthly_threshold = (threshold / Decimal::from(12)).round_dp(2);

    steps.push(AuditStep {
        step_number: 4,
        rule_id: "threshold".to_string(),
        rule_name: "SPM Threshold".to_string(),
        input: serde_json::json!({
            "base_threshold": base.amount.to_string(),
            "equivalence_scale": scale.breakdown.scale.normalize().to_string(),
            "geoadj": location.geoadj.to_string()
        }),
        output: serde_json::json!({
            "threshold": threshold.normalize().to_string(),
            "monthly_threshold": monthly_threshold.to_string()
        }),
        reasoning: format!(
            "${} x {} x {} = ${}",
            base.amount,
            scale.breakdown.scale.round_dp(3).normalize(),
            location.geoadj,
            threshold.round_dp(0)
        ),
    });

    Ok(ThresholdResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        household,
        base_threshold: base.amount,
        base_source: base.source,
        forecast_factor: base.forecast_factor,
        equivalence_scale: scale.breakdown,
        threshold,
        monthly_threshold,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}

pub(crate) fn multiply(base: Decimal, scale: Decimal, geoadj: Decimal) -> EngineResult<Decimal> {
    if scale.is_zero() {
        return Ok(Decimal::ZERO);
    }
    base.checked_mul(scale)
        .and_then(|value| value.checked_mul(geoadj))
        .ok_or_else(|| EngineError::InvalidInput {
            field: "geoadj".to_string(),
            message: format!("threshold for geoadj {} is out of range", geoadj),
        })
}

//! Forecasting base thresholds past the last published year.
//!
//! The last published value is carried forward by compounding each year's
//! projected inflation in order. Years without a projection use the default
//! rate, however far out they are.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ForecastConfig;
use crate::error::{EngineError, EngineResult};

/// Returns the cumulative inflation factor from `from_year` to `to_year`.
///
/// The factor is `(1 + rate(from_year + 1)) x ... x (1 + rate(to_year))`,
/// multiplied in year order. A `to_year` at or before `from_year` gives 1.
///
/// # Errors
///
/// Returns `InvalidInput` if the factor no longer fits in a `Decimal`.
///
/// # Examples
///
/// ```
/// use spm_threshold::calculation::forecast_factor;
/// use spm_threshold::config::ForecastConfig;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let forecast = ForecastConfig {
///     default_inflation: Decimal::new(2, 2),
///     cpi_projections: BTreeMap::from([(2025, Decimal::new(25, 3))]),
/// };
/// // 1.025 x 1.02
/// assert_eq!(forecast_factor(2024, 2026, &forecast).unwrap(), Decimal::new(104550, 5));
/// ```
pub fn forecast_factor(
    from_year: i32,
    to_year: i32,
    forecast: &ForecastConfig,
) -> EngineResult<Decimal> {
    let mut factor = Decimal::ONE;
    for year in (from_year + 1)..=to_year {
        factor = factor
            .checked_mul(Decimal::ONE + forecast.rate(year))
            .ok_or_else(|| EngineError::InvalidInput {
                field: "year".to_string(),
                message: format!(
                    "{} is too far past {} to forecast a threshold",
                    to_year, from_year
                ),
            })?;
    }
    Ok(factor)
}

/// Applies a forecast factor to a published amount, rounding to whole dollars.
///
/// Midpoints round away from zero.
pub fn apply_forecast(amount: Decimal, factor: Decimal) -> EngineResult<Decimal> {
    amount
        .checked_mul(factor)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| EngineError::InvalidInput {
            field: "year".to_string(),
            message: format!("forecast of {} overflows", amount),
        })
}

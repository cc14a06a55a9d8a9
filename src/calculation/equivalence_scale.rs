//! Equivalence scale calculation.
//!
//! The SPM uses a three-parameter scale: the first adult counts 1.0, each
//! further adult 0.5 and each child 0.3. The sum is normalized to the
//! two-adult, two-child reference family, whose raw scale is 2.1, so the
//! reference family always scales to exactly 1.

use rust_decimal::Decimal;

use crate::models::{AuditStep, EquivalenceScaleBreakdown};

/// Weight of the first adult.
pub fn first_adult_weight() -> Decimal {
    Decimal::ONE
}

/// Weight of each adult after the first.
pub fn additional_adult_weight() -> Decimal {
    Decimal::new(5, 1)
}

/// Weight of each child.
pub fn child_weight() -> Decimal {
    Decimal::new(3, 1)
}

/// Raw scale of the reference family: `1.0 + 0.5 x 1 + 0.3 x 2`.
pub fn reference_family_scale() -> Decimal {
    Decimal::new(21, 1)
}

/// The result of an equivalence scale calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct EquivalenceScaleResult {
    /// The scale and its components.
    pub breakdown: EquivalenceScaleBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the normalized equivalence scale for a household.
///
/// An empty household (no adults and no children) returns 0 rather than
/// failing; callers treat that as an undefined household.
///
/// # Examples
///
/// ```
/// use spm_threshold::calculation::equivalence_scale;
/// use rust_decimal::Decimal;
///
/// assert_eq!(equivalence_scale(2, 2), Decimal::ONE);
/// assert_eq!(equivalence_scale(0, 0), Decimal::ZERO);
/// ```
pub fn equivalence_scale(num_adults: u32, num_children: u32) -> Decimal {
    scale_breakdown(num_adults, num_children).scale
}

/// Returns the equivalence scale together with its components.
pub fn scale_breakdown(num_adults: u32, num_children: u32) -> EquivalenceScaleBreakdown {
    let reference_scale = reference_family_scale();

    if num_adults == 0 && num_children == 0 {
        return EquivalenceScaleBreakdown {
            adult_component: Decimal::ZERO,
            child_component: Decimal::ZERO,
            raw_scale: Decimal::ZERO,
            reference_scale,
            scale: Decimal::ZERO,
        };
    }

    let adult_component = if num_adults >= 1 {
        first_adult_weight() + additional_adult_weight() * Decimal::from(num_adults - 1)
    } else {
        Decimal::ZERO
    };
    let child_component = child_weight() * Decimal::from(num_children);
    let raw_scale = adult_component + child_component;

    EquivalenceScaleBreakdown {
        adult_component,
        child_component,
        raw_scale,
        reference_scale,
        scale: raw_scale / reference_scale,
    }
}

/// Calculates the equivalence scale and records an audit step.
///
/// # Arguments
///
/// * `num_adults` - Number of people 18 or older
/// * `num_children` - Number of people under 18
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_equivalence_scale(
    num_adults: u32,
    num_children: u32,
    step_number: u32,
) -> EquivalenceScaleResult {
    let breakdown = scale_breakdown(num_adults, num_children);

    let reasoning = if num_adults == 0 && num_children == 0 {
        "Household has no adults and no children; equivalence scale is 0".to_string()
    } else {
        format!(
            "Adults: {} -> {}; children: {} x {} = {}; raw scale {} / {} = {}",
            num_adults,
            breakdown.adult_component.normalize(),
            num_children,
            child_weight(),
            breakdown.child_component.normalize(),
            breakdown.raw_scale.normalize(),
            breakdown.reference_scale,
            breakdown.scale.round_dp(3).normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "equivalence_scale".to_string(),
        rule_name: "Equivalence Scale".to_string(),
        input: serde_json::json!({
            "num_adults": num_adults,
            "num_children": num_children
        }),
        output: serde_json::json!({
            "adult_component": breakdown.adult_component.normalize().to_string(),
            "child_component": breakdown.child_component.normalize().to_string(),
            "raw_scale": breakdown.raw_scale.normalize().to_string(),
            "scale": breakdown.scale.normalize().to_string()
        }),
        reasoning,
    };

    EquivalenceScaleResult {
        breakdown,
        audit_step,
    }
}

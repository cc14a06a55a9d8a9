//! Household input model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Tenure;

/// The caller-supplied description of an SPM unit.
///
/// Counts are unsigned, so a negative household cannot be expressed. The
/// geographic adjustment is already resolved; see
/// [`resolve_geoadj`](crate::calculation::resolve_geoadj) for turning a
/// preset or state code into a factor.
///
/// # Examples
///
/// ```
/// use spm_threshold::models::{HouseholdInput, Tenure};
/// use rust_decimal::Decimal;
///
/// let household = HouseholdInput {
///     year: 2024,
///     tenure: Tenure::Renter,
///     num_adults: 2,
///     num_children: 2,
///     geoadj: Decimal::ONE,
/// };
/// assert_eq!(household.size(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdInput {
    /// The threshold year.
    pub year: i32,
    /// The household's housing tenure.
    pub tenure: Tenure,
    /// Number of people 18 or older.
    pub num_adults: u32,
    /// Number of people under 18.
    pub num_children: u32,
    /// Geographic adjustment factor.
    pub geoadj: Decimal,
}

impl HouseholdInput {
    /// Returns true if the household has nobody in it.
    pub fn is_degenerate(&self) -> bool {
        self.num_adults == 0 && self.num_children == 0
    }

    /// Total number of people in the household.
    pub fn size(&self) -> u32 {
        self.num_adults.saturating_add(self.num_children)
    }
}

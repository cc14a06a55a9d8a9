//! Housing tenure model.
//!
//! Each tenure carries its own published base threshold, so the set of
//! tenures is closed: parsing is the only place an unknown value can appear.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Represents the housing status of an SPM unit.
///
/// Deserializes through [`FromStr`], so keys and labels are both accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Tenure {
    /// Renters.
    Renter,
    /// Owners paying a mortgage.
    OwnerWithMortgage,
    /// Owners without a mortgage.
    OwnerWithoutMortgage,
}

impl Tenure {
    /// All tenures, in the order the published tables list them.
    pub const ALL: [Tenure; 3] = [
        Tenure::Renter,
        Tenure::OwnerWithMortgage,
        Tenure::OwnerWithoutMortgage,
    ];

    /// Returns the snake_case key used in configuration and export files.
    ///
    /// # Examples
    ///
    /// ```
    /// use spm_threshold::models::Tenure;
    ///
    /// assert_eq!(Tenure::OwnerWithMortgage.key(), "owner_with_mortgage");
    /// ```
    pub fn key(self) -> &'static str {
        match self {
            Tenure::Renter => "renter",
            Tenure::OwnerWithMortgage => "owner_with_mortgage",
            Tenure::OwnerWithoutMortgage => "owner_without_mortgage",
        }
    }

    /// Returns the human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Tenure::Renter => "Renter",
            Tenure::OwnerWithMortgage => "Owner with mortgage",
            Tenure::OwnerWithoutMortgage => "Owner without mortgage",
        }
    }
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tenure {
    type Err = EngineError;

    /// Parses a tenure from its key or its label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "renter" => Ok(Tenure::Renter),
            "owner_with_mortgage" => Ok(Tenure::OwnerWithMortgage),
            "owner_without_mortgage" => Ok(Tenure::OwnerWithoutMortgage),
            _ => Err(EngineError::InvalidInput {
                field: "tenure".to_string(),
                message: format!(
                    "'{}' is not one of renter, owner_with_mortgage, owner_without_mortgage",
                    s
                ),
            }),
        }
    }
}

impl TryFrom<String> for Tenure {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

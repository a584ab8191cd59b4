//! Check types
//!
//! Defines how strongly a guideline is enforced in the review.

use serde::{Deserialize, Serialize};

/// Guideline strength of a check
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckType {
    /// Mandatory guideline - a failure is a review issue
    Must,
    /// Recommended guideline - a failure is still listed as an issue
    Should,
    /// Extra information for the reviewer, never an issue
    #[default]
    Extra,
}

impl CheckType {
    /// All types in report order
    pub const ALL: [Self; 3] = [Self::Must, Self::Should, Self::Extra];

    /// Whether a failure of this type is reported as an issue
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Must | Self::Should)
    }
}

impl std::fmt::Display for CheckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Must => write!(f, "MUST"),
            Self::Should => write!(f, "SHOULD"),
            Self::Extra => write!(f, "EXTRA"),
        }
    }
}

impl std::str::FromStr for CheckType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "must" => Ok(Self::Must),
            "should" => Ok(Self::Should),
            "extra" => Ok(Self::Extra),
            _ => Err(format!("Invalid check type: {s}. Use: MUST, SHOULD, EXTRA")),
        }
    }
}

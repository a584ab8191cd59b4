//! Check states
//!
//! The outcome of a single check once the review has run.

use serde::{Deserialize, Serialize};

/// State of a check after the review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// The guideline is satisfied
    Pass,
    /// The guideline is violated
    Fail,
    /// The guideline does not apply to this package
    Na,
    /// Not evaluated - needs manual review
    #[default]
    Pending,
}

impl CheckState {
    /// Checklist marker used in the text report
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Pass => "[x]",
            Self::Fail => "[!]",
            Self::Na => "[-]",
            Self::Pending => "[ ]",
        }
    }

    /// Whether a dependent check may run after this state
    #[must_use]
    pub const fn satisfies_dependents(self) -> bool {
        matches!(self, Self::Pass | Self::Na)
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Na => write!(f, "na"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

impl std::str::FromStr for CheckState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            "na" | "n/a" => Ok(Self::Na),
            "pending" => Ok(Self::Pending),
            _ => Err(format!("Invalid check state: {s}. Use: pass, fail, na, pending")),
        }
    }
}

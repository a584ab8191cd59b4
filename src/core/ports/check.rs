//! Check port
//!
//! Defines what a check is to the registry: static metadata, an
//! applicability test and a run method. Built-in checks and shell-script
//! plugins both implement [`Check`].

use std::fmt;

use thiserror::Error;

use super::{CheckContext, ToolError};
use crate::core::models::{CheckInfo, CheckOutcome, Flag};

/// Errors a check can raise while running
///
/// The run engine records these as a pending result with the error text as
/// the note; they never abort the review.
#[derive(Debug, Error)]
pub enum CheckError {
    /// An external tool failed
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Filesystem access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Input the check relies on is not available
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Tool output could not be understood
    #[error("unexpected output from {tool}: {detail}")]
    UnexpectedOutput {
        /// Tool name
        tool: String,
        /// What was wrong
        detail: String,
    },
}

/// A packaging-guideline rule
pub trait Check: Send + Sync + fmt::Debug {
    /// Static metadata (name, group, type, relations)
    fn info(&self) -> &CheckInfo;

    /// Whether the check applies to the package under review
    fn is_applicable(&self, _ctx: &CheckContext<'_>) -> bool {
        true
    }

    /// Evaluate the rule
    fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError>;
}

/// Group applicability test
pub type Applicability = fn(&CheckContext<'_>) -> bool;

fn always(_ctx: &CheckContext<'_>) -> bool {
    true
}

/// A named group of checks that applies (or not) as a whole
#[derive(Debug, Clone)]
pub struct Group {
    /// Group name shown in the report (e.g. "C/C++")
    pub name: String,
    /// Whether checks of this group apply to the package
    pub applies: Applicability,
    /// Flags contributed by the group
    pub flags: Vec<Flag>,
}

impl Group {
    /// Create an always-applicable group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applies: always,
            flags: Vec::new(),
        }
    }

    /// Restrict the group to packages matching `applies`
    #[must_use]
    pub fn applicable_when(mut self, applies: Applicability) -> Self {
        self.applies = applies;
        self
    }

    /// Contribute a flag
    #[must_use]
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }
}

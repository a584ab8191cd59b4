//! Review errors
//!
//! Failures that stop a review. Problems inside a single check are
//! [`CheckError`](crate::core::ports::CheckError)s instead and only affect
//! that check's result.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::ports::ToolError;
use crate::specfile::SpecParseError;

/// Errors that abort a review
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Two checks share a name
    #[error("check {0} is already registered")]
    DuplicateCheck(String),

    /// Two groups declare the same flag
    #[error("flag {0} is already registered")]
    DuplicateFlag(String),

    /// A flag that no group declares
    #[error("unknown flag: {0} (use --display-flags to list flags)")]
    UnknownFlag(String),

    /// A check name that is not registered
    #[error("unknown check: {0} (use --list-checks to list checks)")]
    UnknownCheck(String),

    /// A check needs a check that is not registered
    #[error("check {check} needs unknown check {needs}")]
    UnknownDependency {
        /// Dependent check
        check: String,
        /// Missing dependency
        needs: String,
    },

    /// The needs graph has a cycle
    #[error("dependency cycle between checks: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// A plugin script could not be loaded
    #[error("invalid plugin {path}: {reason}")]
    Plugin {
        /// Script path
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// The review source could not be resolved
    #[error("{0}")]
    Source(String),

    /// The spec file could not be parsed
    #[error(transparent)]
    Spec(#[from] SpecParseError),

    /// An external tool failed
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Filesystem access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

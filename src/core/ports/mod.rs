//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the review engine and the
//! outside world (external tools, check implementations).
//!
//! Implementations live in the `adapters` and `checks` modules.

mod check;
mod context;
mod tool_runner;

pub use check::{Applicability, Check, CheckError, Group};
pub use context::{CheckContext, ReviewInputs};
pub use tool_runner::{ToolError, ToolInvocation, ToolOutput, ToolRunner};

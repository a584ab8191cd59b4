//! Domain models for pkgreview
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`CheckInfo`] - "This guideline, in this group, at this strength"
//! - [`CheckOutcome`] - What running a check produced
//! - [`CheckResult`] - Metadata and outcome as recorded by the review
//! - [`CheckType`] - MUST / SHOULD / EXTRA
//! - [`CheckState`] - pass / fail / na / pending
//! - [`Flag`] - A user-settable switch checks can query
//! - [`BuiltPackage`] - A binary package under review

mod check;
mod check_type;
mod flag;
mod package;
mod state;

pub use check::{Attachment, CheckInfo, CheckOutcome, CheckResult};
pub use check_type::CheckType;
pub use flag::{Flag, FlagSet, parse_activation};
pub use package::{BuildStatus, BuiltPackage, InstallStatus};
pub use state::CheckState;

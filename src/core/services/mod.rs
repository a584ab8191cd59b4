//! Review services
//!
//! - `registry` - name-keyed check, group and flag registry
//! - `ordering` - stable dependency ordering
//! - `runner` - applicability, deprecation, selection and execution
//! - `report` - collation of results into the checklist

pub mod ordering;
pub mod registry;
pub mod report;
pub mod runner;

pub use registry::CheckRegistry;
pub use report::{Report, ReportMeta, Summary};
pub use runner::{ReviewResults, Selection, run_checks};

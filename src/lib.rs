//! pkgreview - packaging-guideline review assistant for RPM packages
//!
//! This library provides the review engine: a registry of checks, the run
//! engine that orders them by dependency and records their results, the
//! built-in packaging checks and the report that collates the results.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![deny(unsafe_code)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod checks;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod paths;
pub mod session;
pub mod source;
pub mod specfile;

pub use error::ReviewError;

//! Core review engine
//!
//! This module contains the check registry and run engine with no direct
//! I/O. External programs are reached through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (CheckInfo, CheckResult, Flag, BuiltPackage)
//! - `ports/` - Trait definitions (Check, ToolRunner) and the check context
//! - `services/` - Registry, ordering, execution and report collation

pub mod models;
pub mod ports;
pub mod services;

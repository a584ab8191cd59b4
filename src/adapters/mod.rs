//! Adapter implementations for port traits and external tools
//!
//! - `process` - system [`ToolRunner`](crate::core::ports::ToolRunner)
//! - `rpm` - `rpm -qp` / `rpmspec -P` queries
//! - `unpack` - source RPM extraction
//! - `mock` - chroot builds and installs
//! - `rpmlint` - lint runs and summary parsing
//! - `script` - shell-script check plugins

pub mod mock;
pub mod process;
pub mod rpm;
pub mod rpmlint;
pub mod script;
pub mod unpack;

pub use process::SystemToolRunner;

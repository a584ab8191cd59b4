//! Command implementations

mod init_config;
mod listing;
mod review;

pub use init_config::init_config;
pub use listing::{display_flags, list_checks};
pub use review::review;

//! Centralized path definitions for pkgreview
//!
//! ## Review work directory
//!
//! ```text
//! <name>-review/
//! ├── srpm-unpacked/     # Contents of the source rpm
//! ├── results/           # Build results (binary rpms, logs)
//! └── review.txt         # Rendered report
//! ```
//!
//! ## Global (user-level)
//!
//! ```text
//! ~/.pkgreview/
//! ├── config.toml        # Review defaults
//! └── plugins/           # Suggested location for script checks
//! ```

use std::path::{Path, PathBuf};

/// Unpacked source rpm subdirectory
pub const UNPACKED_DIR: &str = "srpm-unpacked";

/// Build results subdirectory
pub const RESULTS_DIR: &str = "results";

/// Report filename
pub const REPORT_FILE: &str = "review.txt";

/// Global config directory name
const GLOBAL_DIR: &str = ".pkgreview";

/// Global config filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Default work directory for a package: `<parent>/<name>-review`
#[must_use]
pub fn review_dir(parent: &Path, name: &str) -> PathBuf {
    parent.join(format!("{name}-review"))
}

/// Where the source rpm is unpacked
#[must_use]
pub fn unpacked_dir(workdir: &Path) -> PathBuf {
    workdir.join(UNPACKED_DIR)
}

/// Where build results land
#[must_use]
pub fn results_dir(workdir: &Path) -> PathBuf {
    workdir.join(RESULTS_DIR)
}

/// The rendered report
#[must_use]
pub fn report_file(workdir: &Path) -> PathBuf {
    workdir.join(REPORT_FILE)
}

/// Get the global pkgreview directory.
///
/// Returns `~/.pkgreview/`.
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(GLOBAL_DIR)
}

/// Get the global config file path.
///
/// Returns `~/.pkgreview/config.toml`.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(GLOBAL_CONFIG_FILE)
}

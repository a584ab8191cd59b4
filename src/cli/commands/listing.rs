//! `--list-checks` and `--display-flags`

use std::path::PathBuf;

use anyhow::Context;

use pkgreview::config::GlobalConfig;
use pkgreview::core::services::CheckRegistry;
use pkgreview::output::{CheckListing, FlagListing, OutputMode};
use pkgreview::session::build_registry;

fn registry(plugin_dirs: &[PathBuf]) -> anyhow::Result<CheckRegistry> {
    let mut dirs = GlobalConfig::load().plugin_dirs;
    dirs.extend(plugin_dirs.iter().cloned());
    build_registry(&dirs, &[]).context("cannot load checks")
}

/// List built-in and plugin checks
pub fn list_checks(plugin_dirs: &[PathBuf], mode: OutputMode) -> anyhow::Result<()> {
    CheckListing::from_registry(&registry(plugin_dirs)?).render(mode);
    Ok(())
}

/// List the flags checks understand
pub fn display_flags(plugin_dirs: &[PathBuf], mode: OutputMode) -> anyhow::Result<()> {
    FlagListing::from_registry(&registry(plugin_dirs)?).render(mode);
    Ok(())
}

//! `rpm` / `rpmspec` queries

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::core::models::BuiltPackage;
use crate::core::ports::{ToolError, ToolInvocation, ToolOutput, ToolRunner};

/// Whether a path names a source RPM
#[must_use]
pub fn is_source_rpm(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".src.rpm"))
}

/// Expand a spec file with `rpmspec -P`
///
/// Returns `None` when `rpmspec` is not installed or fails; callers fall
/// back to the unexpanded text.
pub fn expand_spec(tools: &dyn ToolRunner, spec: &Path) -> Option<String> {
    if !tools.is_available("rpmspec") {
        debug!("rpmspec not available, using unexpanded spec");
        return None;
    }
    match tools.run_checked(&ToolInvocation::new("rpmspec").arg("-P").path_arg(spec)) {
        Ok(output) => Some(output.stdout),
        Err(e) => {
            warn!("rpmspec -P failed, using unexpanded spec: {e}");
            None
        },
    }
}

/// Query name, files and dependencies of a binary RPM
pub fn query_package(tools: &dyn ToolRunner, rpm: &Path) -> Result<BuiltPackage, ToolError> {
    let name = rpm_query(tools, rpm, &["--qf", "%{NAME}"])?.stdout.trim().to_string();
    let mut package = BuiltPackage::new(name, rpm);
    package.files = rpm_query(tools, rpm, &["-l"])?
        .lines()
        .filter(|l| *l != "(contains no files)")
        .map(str::to_string)
        .collect();
    package.requires = dependency_names(&rpm_query(tools, rpm, &["--requires"])?.stdout);
    package.provides = dependency_names(&rpm_query(tools, rpm, &["--provides"])?.stdout);
    Ok(package)
}

fn rpm_query(tools: &dyn ToolRunner, rpm: &Path, args: &[&str]) -> Result<ToolOutput, ToolError> {
    tools.run_checked(&ToolInvocation::new("rpm").arg("-qp").args(args.iter().copied()).path_arg(rpm))
}

/// Query every binary RPM, skipping source packages
pub fn query_packages(tools: &dyn ToolRunner, rpms: &[PathBuf]) -> Result<Vec<BuiltPackage>, ToolError> {
    rpms.iter().filter(|p| !is_source_rpm(p)).map(|p| query_package(tools, p)).collect()
}

/// First token of each dependency line, without `rpmlib(...)` internals
fn dependency_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .filter(|n| !n.starts_with("rpmlib("))
        .map(str::to_string)
        .collect()
}

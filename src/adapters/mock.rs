//! `mock` builds and installs

use std::path::{Path, PathBuf};

use log::info;

use super::rpm::is_source_rpm;
use crate::core::ports::{ToolError, ToolInvocation, ToolRunner};

/// A configured `mock` front-end
#[derive(Debug, Clone, Copy)]
pub struct Mock<'a> {
    tools: &'a dyn ToolRunner,
    config: Option<&'a str>,
    options: &'a [String],
}

impl<'a> Mock<'a> {
    /// Create a front-end using `config` (`-r`) and extra options
    #[must_use]
    pub const fn new(tools: &'a dyn ToolRunner, config: Option<&'a str>, options: &'a [String]) -> Self {
        Self {
            tools,
            config,
            options,
        }
    }

    fn command(&self) -> ToolInvocation {
        let mut inv = ToolInvocation::new("mock");
        if let Some(config) = self.config {
            inv = inv.args(["-r", config]);
        }
        inv.args(self.options.iter().cloned())
    }

    /// Rebuild a source RPM, returning the binary RPMs it produced
    pub fn rebuild(&self, srpm: &Path, resultdir: &Path) -> Result<Vec<PathBuf>, ToolError> {
        info!("Building {} with mock", srpm.display());
        let inv = self
            .command()
            .arg("--rebuild")
            .path_arg(srpm)
            .arg("--resultdir")
            .path_arg(resultdir);
        self.tools.run_checked(&inv)?;
        Ok(binary_rpms_in(resultdir))
    }

    /// Install binary RPMs into the mock chroot
    pub fn install(&self, rpms: &[PathBuf]) -> Result<(), ToolError> {
        info!("Installing {} package(s) with mock", rpms.len());
        let mut inv = self.command().arg("--install");
        for rpm in rpms {
            inv = inv.path_arg(rpm);
        }
        self.tools.run_checked(&inv)?;
        Ok(())
    }
}

/// Binary (non-source) RPMs in a directory, sorted
#[must_use]
pub fn binary_rpms_in(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/*.rpm", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut rpms: Vec<PathBuf> = glob::glob(&pattern)
        .map(|paths| paths.filter_map(Result::ok).filter(|p| !is_source_rpm(p)).collect())
        .unwrap_or_default();
    rpms.sort();
    rpms
}

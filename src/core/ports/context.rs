//! Check context
//!
//! Everything a check may look at: the parsed spec, the source package and
//! its unpacked tree, the built packages, the review flags and the tool
//! runner used to query external programs.

use std::path::{Path, PathBuf};

use super::ToolRunner;
use crate::core::models::{BuildStatus, BuiltPackage, FlagSet, InstallStatus};
use crate::specfile::SpecFile;

/// Inputs collected before the checks run
#[derive(Debug, Clone)]
pub struct ReviewInputs {
    /// Parsed spec file
    pub spec: SpecFile,
    /// Source RPM, if one is reviewed
    pub srpm: Option<PathBuf>,
    /// Directory holding the unpacked source RPM
    pub unpacked_dir: Option<PathBuf>,
    /// Binary packages under review
    pub packages: Vec<BuiltPackage>,
    /// Build step status
    pub build: BuildStatus,
    /// Install step status
    pub install: InstallStatus,
    /// Review working directory
    pub workdir: PathBuf,
}

impl ReviewInputs {
    /// Inputs for a spec-only review rooted at `workdir`
    #[must_use]
    pub fn from_spec(spec: SpecFile, workdir: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            srpm: None,
            unpacked_dir: None,
            packages: Vec::new(),
            build: BuildStatus::NotRun,
            install: InstallStatus::NotRun,
            workdir: workdir.into(),
        }
    }
}

/// Read-only view handed to every check
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Collected inputs
    pub inputs: &'a ReviewInputs,
    /// Review flags
    pub flags: &'a FlagSet,
    /// External tool runner
    pub tools: &'a dyn ToolRunner,
}

impl<'a> CheckContext<'a> {
    /// Bundle inputs, flags and tools
    #[must_use]
    pub const fn new(inputs: &'a ReviewInputs, flags: &'a FlagSet, tools: &'a dyn ToolRunner) -> Self {
        Self {
            inputs,
            flags,
            tools,
        }
    }

    /// The parsed spec
    #[must_use]
    pub const fn spec(&self) -> &'a SpecFile {
        &self.inputs.spec
    }

    /// Built packages
    #[must_use]
    pub fn packages(&self) -> &'a [BuiltPackage] {
        &self.inputs.packages
    }

    /// Every `(package, file)` pair across built packages
    pub fn all_files(&self) -> impl Iterator<Item = (&'a BuiltPackage, &'a str)> + 'a {
        self.inputs
            .packages
            .iter()
            .flat_map(|p| p.files.iter().map(move |f| (p, f.as_str())))
    }

    /// Whether any built package ships a file ending with one of `suffixes`
    #[must_use]
    pub fn ships_suffix(&self, suffixes: &[&str]) -> bool {
        self.all_files().any(|(_, f)| suffixes.iter().any(|s| f.ends_with(s)))
    }

    /// Unpacked source package directory
    #[must_use]
    pub fn unpacked_dir(&self) -> Option<&'a Path> {
        self.inputs.unpacked_dir.as_deref()
    }

    /// Review working directory
    #[must_use]
    pub fn workdir(&self) -> &'a Path {
        &self.inputs.workdir
    }

    /// Whether a flag is set
    #[must_use]
    pub fn flag_set(&self, name: &str) -> bool {
        self.flags.is_set(name)
    }
}

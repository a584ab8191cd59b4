//! Packages under review
//!
//! What the review knows about the binary packages it inspects, and how the
//! build and install steps went.

use std::path::PathBuf;

use serde::Serialize;

/// A binary package produced by the build (or supplied prebuilt)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltPackage {
    /// Package name (`%{NAME}`)
    pub name: String,
    /// Path to the `.rpm` file
    pub path: PathBuf,
    /// Files the package installs
    pub files: Vec<String>,
    /// Requirement names
    pub requires: Vec<String>,
    /// Provided capabilities
    pub provides: Vec<String>,
}

impl BuiltPackage {
    /// Create a package record with no file or dependency information
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            files: Vec::new(),
            requires: Vec::new(),
            provides: Vec::new(),
        }
    }

    /// Whether this is a `-devel` sub-package
    #[must_use]
    pub fn is_devel(&self) -> bool {
        self.name.ends_with("-devel")
    }

    /// Whether this is a `-static` sub-package
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.name.ends_with("-static")
    }

    /// Files whose name ends with `suffix`
    pub fn files_with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.files.iter().map(String::as_str).filter(move |f| f.ends_with(suffix))
    }
}

/// How the build step went
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum BuildStatus {
    /// No build was attempted
    #[default]
    NotRun,
    /// Packages were supplied prebuilt
    Prebuilt,
    /// The build succeeded
    Built,
    /// The build failed
    Failed(String),
}

/// How the install step went
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum InstallStatus {
    /// No install was attempted
    #[default]
    NotRun,
    /// All packages installed
    Installed,
    /// The install failed
    Failed(String),
}

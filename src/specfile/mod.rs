//! RPM spec file model and parser
//!
//! Parses the structure of a spec file (preamble tags, macro definitions and
//! `%sections`) without evaluating it. Macro expansion is left to `rpmspec`;
//! only the handful of substitutions needed to name sub-packages are done
//! here.

mod parser;
mod section;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub use parser::parse_requirement_names;
pub use section::{Section, SectionKind};

/// Errors that can occur while loading a spec file
#[derive(Debug, Error)]
pub enum SpecParseError {
    /// The spec file could not be read
    #[error("cannot read spec file {path}: {source}")]
    Io {
        /// Spec path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The spec has no `Name:` tag
    #[error("spec file {0} has no Name tag")]
    MissingName(PathBuf),
}

/// A `Tag: value` line from a package preamble
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Tag name as written (e.g. "BuildRequires", "Source0", "Requires(post)")
    pub name: String,
    /// Raw value
    pub value: String,
    /// 1-based line number
    pub line: usize,
}

impl Tag {
    /// Tag name without qualifier, lower-cased (`Requires(post)` -> `requires`)
    #[must_use]
    pub fn base_name(&self) -> String {
        self.name.split('(').next().unwrap_or(&self.name).to_lowercase()
    }
}

/// A package declared by the spec (main package or `%package` sub-package)
#[derive(Debug, Clone, Serialize)]
pub struct Package {
    /// Full package name
    pub name: String,
    /// Preamble tags in file order
    pub tags: Vec<Tag>,
}

impl Package {
    /// First value of a tag (case-insensitive, qualifiers ignored)
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags(name).next()
    }

    /// All values of a tag (case-insensitive, qualifiers ignored)
    pub fn tags<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let wanted = name.to_lowercase();
        self.tags
            .iter()
            .filter(move |t| t.base_name() == wanted)
            .map(|t| t.value.as_str())
    }

    /// Names of everything listed in `Requires` tags
    #[must_use]
    pub fn requires(&self) -> Vec<String> {
        self.tags("requires").flat_map(parse_requirement_names).collect()
    }
}

/// A parsed spec file
#[derive(Debug, Clone, Serialize)]
pub struct SpecFile {
    /// Where the spec was read from
    pub path: PathBuf,
    /// Main package first, then sub-packages in declaration order
    pub packages: Vec<Package>,
    /// Sections in file order
    pub sections: Vec<Section>,
    /// `%global` / `%define` definitions (raw, unexpanded)
    pub macros: BTreeMap<String, String>,
    /// Full spec text
    #[serde(skip)]
    pub text: String,
}

impl SpecFile {
    /// Read and parse a spec file from disk
    pub fn load(path: &Path) -> Result<Self, SpecParseError> {
        let text = fs::read_to_string(path).map_err(|source| SpecParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse spec text
    pub fn parse(path: &Path, text: &str) -> Result<Self, SpecParseError> {
        parser::parse(path, text)
    }

    /// The main package
    #[must_use]
    pub fn main_package(&self) -> &Package {
        &self.packages[0]
    }

    /// Main package name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.main_package().name
    }

    /// Raw `Version` tag
    #[must_use]
    pub fn version(&self) -> &str {
        self.tag("version").unwrap_or_default()
    }

    /// Raw `Release` tag
    #[must_use]
    pub fn release(&self) -> &str {
        self.tag("release").unwrap_or_default()
    }

    /// First value of a main package tag
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.main_package().tag(name)
    }

    /// Look up a package by full name
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// `SourceN` tags of the main package, in order
    #[must_use]
    pub fn sources(&self) -> Vec<&Tag> {
        self.numbered_tags("source")
    }

    /// `PatchN` tags of the main package, in order
    #[must_use]
    pub fn patches(&self) -> Vec<&Tag> {
        self.numbered_tags("patch")
    }

    fn numbered_tags(&self, prefix: &str) -> Vec<&Tag> {
        self.main_package()
            .tags
            .iter()
            .filter(|t| {
                let lower = t.name.to_lowercase();
                lower
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
            })
            .collect()
    }

    /// Names of all build requirements, across packages
    #[must_use]
    pub fn build_requires(&self) -> Vec<String> {
        self.packages
            .iter()
            .flat_map(|p| p.tags("buildrequires"))
            .flat_map(parse_requirement_names)
            .collect()
    }

    /// Whether any build requirement has this name
    #[must_use]
    pub fn build_requires_any(&self, names: &[&str]) -> bool {
        self.build_requires().iter().any(|r| names.contains(&r.as_str()))
    }

    /// First section of a kind
    #[must_use]
    pub fn section(&self, kind: &SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| &s.kind == kind)
    }

    /// All sections of a kind
    pub fn sections_of<'a>(&'a self, kind: &'a SectionKind) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections.iter().filter(move |s| &s.kind == kind)
    }

    /// Whether the spec has a section of this kind
    #[must_use]
    pub fn has_section(&self, kind: &SectionKind) -> bool {
        self.section(kind).is_some()
    }

    /// Substitute `%{name}`, `%{version}`, `%{release}` and simple `%global` values
    #[must_use]
    pub fn expand(&self, input: &str) -> String {
        parser::expand_simple(input, &self.simple_macros())
    }

    /// Like [`SpecFile::expand`], with undefined conditional macros removed
    ///
    /// `1%{?dist}` becomes `1` when no `dist` is known.
    #[must_use]
    pub fn expand_resolved(&self, input: &str) -> String {
        let macros = self.simple_macros();
        parser::resolve_conditionals(&parser::expand_simple(input, &macros), &macros)
    }

    fn simple_macros(&self) -> BTreeMap<String, String> {
        let mut macros = self.macros.clone();
        let main = self.main_package();
        macros.insert("name".into(), main.name.clone());
        for tag in ["version", "release", "epoch"] {
            if let Some(v) = main.tag(tag) {
                macros.insert(tag.into(), v.to_string());
            }
        }
        macros
    }

    /// Lines outside any comment, used for whole-file pattern checks
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim_start().starts_with('#'))
    }
}

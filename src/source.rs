//! Review source resolution
//!
//! Turns `--name`, `--spec`, `--srpm` and `--rpm-spec` into the files a
//! review starts from.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;

use crate::error::ReviewError;

/// What the user asked to review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRequest {
    /// Package name looked up in the current directory
    pub name: Option<String>,
    /// Explicit spec file
    pub spec: Option<PathBuf>,
    /// Explicit source rpm
    pub srpm: Option<PathBuf>,
    /// Review the spec unpacked from the source rpm
    pub rpm_spec: bool,
}

/// Files a review starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSource {
    /// Package name (used for the work directory)
    pub name: String,
    /// Local spec file; `None` means the spec comes from the source rpm
    pub spec: Option<PathBuf>,
    /// Source rpm, if any
    pub srpm: Option<PathBuf>,
}

impl SourceRequest {
    /// Resolve the request against `dir`, the current directory
    ///
    /// Relative paths are joined onto `dir`, so the resolved files stay
    /// valid for tools and plugins running elsewhere.
    pub fn resolve(&self, dir: &Path) -> Result<ReviewSource, ReviewError> {
        let (spec, srpm) = match &self.name {
            Some(name) => {
                let spec = dir.join(format!("{name}.spec"));
                let srpm = newest_srpm(dir, name);
                (spec.is_file().then_some(spec), srpm)
            },
            None => (
                self.spec.as_ref().map(|p| dir.join(p)),
                self.srpm.as_ref().map(|p| dir.join(p)),
            ),
        };

        for path in spec.iter().chain(srpm.iter()) {
            if !path.is_file() {
                return Err(ReviewError::Source(format!("no such file: {}", path.display())));
            }
        }

        let spec = if self.rpm_spec { None } else { spec };
        if spec.is_none() && srpm.is_none() {
            return Err(ReviewError::Source(match (&self.name, self.rpm_spec) {
                (_, true) => "--rpm-spec needs a source rpm".to_string(),
                (Some(name), false) => {
                    format!("neither {name}.spec nor {name}-*.src.rpm found in {}", dir.display())
                },
                (None, false) => "nothing to review: use --name, --spec or --srpm".to_string(),
            }));
        }

        let name = self
            .name
            .clone()
            .or_else(|| spec.as_deref().and_then(spec_stem))
            .or_else(|| srpm.as_deref().and_then(srpm_package_name))
            .ok_or_else(|| ReviewError::Source("cannot derive a package name".to_string()))?;
        debug!("Review source for {name}: spec={spec:?} srpm={srpm:?}");
        Ok(ReviewSource { name, spec, srpm })
    }
}

/// The most recently modified `<name>-*.src.rpm` in `dir`
#[must_use]
pub fn newest_srpm(dir: &Path, name: &str) -> Option<PathBuf> {
    let pattern = format!(
        "{}/{}-*.src.rpm",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(name)
    );
    glob::glob(&pattern)
        .ok()?
        .filter_map(Result::ok)
        .filter(|p| p.file_name().is_some_and(|f| srpm_package_name_of(&f.to_string_lossy()) == Some(name)))
        .max_by_key(|p| modified(p))
}

fn modified(path: &Path) -> SystemTime {
    fs::metadata(path).and_then(|m| m.modified()).unwrap_or(SystemTime::UNIX_EPOCH)
}

fn spec_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Package name of a source rpm path (`foo-bar-1.0-1.fc41.src.rpm` is `foo-bar`)
#[must_use]
pub fn srpm_package_name(path: &Path) -> Option<String> {
    let file = path.file_name()?.to_string_lossy().into_owned();
    srpm_package_name_of(&file).map(String::from)
}

fn srpm_package_name_of(file: &str) -> Option<&str> {
    let nvr = file.strip_suffix(".src.rpm")?;
    let (nv, _release) = nvr.rsplit_once('-')?;
    let (name, _version) = nv.rsplit_once('-')?;
    (!name.is_empty()).then_some(name)
}

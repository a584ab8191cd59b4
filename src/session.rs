//! Review orchestration
//!
//! Runs one review end to end: resolve the source, prepare the work
//! directory, unpack and build the package, collect package data, run the
//! checks and write `review.txt`.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::adapters::mock::{Mock, binary_rpms_in};
use crate::adapters::rpm::{expand_spec, query_packages};
use crate::adapters::script::load_scripts;
use crate::adapters::unpack::{find_spec, unpack_srpm};
use crate::checks::register_builtin;
use crate::config::GlobalConfig;
use crate::core::models::{BuildStatus, InstallStatus};
use crate::core::ports::{ReviewInputs, ToolRunner};
use crate::core::services::{CheckRegistry, Report, ReportMeta, ReviewResults, Selection, run_checks};
use crate::error::ReviewError;
use crate::paths;
use crate::source::{ReviewSource, SourceRequest};
use crate::specfile::SpecFile;

/// How binary packages are obtained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Rebuild the source rpm with mock
    #[default]
    Mock,
    /// Do not build; package checks see no binary packages
    Skip,
    /// Use already built rpms from a directory (current directory if `None`)
    Prebuilt(Option<PathBuf>),
}

/// Everything a review run is configured with
#[derive(Debug, Clone, Default)]
pub struct ReviewSettings {
    /// What to review
    pub source: SourceRequest,
    /// Explicit work directory
    pub workdir: Option<PathBuf>,
    /// Parent of the default `<name>-review` work directory
    pub workdir_parent: Option<PathBuf>,
    /// Mock chroot configuration
    pub mock_config: Option<String>,
    /// Extra mock options
    pub mock_options: Vec<String>,
    /// Build step
    pub build: BuildMode,
    /// Whether to install the built packages
    pub install: bool,
    /// Check selection
    pub selection: Selection,
    /// Flag activations (`NAME` or `NAME=value`), applied in order
    pub flags: Vec<String>,
    /// Plugin directories
    pub plugin_dirs: Vec<PathBuf>,
}

impl ReviewSettings {
    /// Fill in defaults from the global config
    ///
    /// Values given on the command line win; list values from the config
    /// come first and command-line entries are appended.
    #[must_use]
    pub fn with_config(mut self, config: &GlobalConfig) -> Self {
        if self.mock_config.is_none() {
            self.mock_config.clone_from(&config.mock_config);
        }
        if self.mock_options.is_empty() {
            self.mock_options = config.mock_args();
        }
        if self.workdir_parent.is_none() {
            self.workdir_parent.clone_from(&config.workdir);
        }

        let mut plugin_dirs = config.plugin_dirs.clone();
        plugin_dirs.append(&mut self.plugin_dirs);
        plugin_dirs.dedup();
        self.plugin_dirs = plugin_dirs;

        let mut flags: Vec<String> = config.flags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        flags.append(&mut self.flags);
        self.flags = flags;

        for name in &config.exclude {
            if !self.selection.exclude.contains(name) {
                self.selection.exclude.push(name.clone());
            }
        }
        self
    }
}

/// A finished review
#[derive(Debug)]
pub struct ReviewOutcome {
    /// Work directory used
    pub workdir: PathBuf,
    /// Path of the written report
    pub report_path: PathBuf,
    /// The collated report
    pub report: Report,
    /// Raw engine results
    pub results: ReviewResults,
}

/// Registry with the built-in checks, plugins from `plugin_dirs` and the
/// given flag activations
pub fn build_registry(plugin_dirs: &[PathBuf], flags: &[String]) -> Result<CheckRegistry, ReviewError> {
    let mut registry = CheckRegistry::new();
    register_builtin(&mut registry)?;
    for script in load_scripts(plugin_dirs)? {
        registry.register(Box::new(script))?;
    }
    for flag in flags {
        registry.set_flag(flag)?;
    }
    registry.validate()?;
    debug!("Registry holds {} checks: {}", registry.len(), registry.names().collect::<Vec<_>>().join(", "));
    Ok(registry)
}

/// Run a complete review from `cwd`
///
/// Relative paths in `settings` are taken relative to `cwd`.
pub fn run_review(settings: &ReviewSettings, tools: &dyn ToolRunner, cwd: &Path) -> Result<ReviewOutcome, ReviewError> {
    let plugin_dirs: Vec<PathBuf> = settings.plugin_dirs.iter().map(|d| cwd.join(d)).collect();
    let registry = build_registry(&plugin_dirs, &settings.flags)?;
    let source = settings.source.resolve(cwd)?;
    info!("Reviewing {}", source.name);

    let workdir = match (&settings.workdir, &settings.workdir_parent) {
        (Some(dir), _) => cwd.join(dir),
        (None, Some(parent)) => paths::review_dir(&cwd.join(parent), &source.name),
        (None, None) => paths::review_dir(cwd, &source.name),
    };
    fs::create_dir_all(paths::results_dir(&workdir))?;
    debug!("Work directory: {}", workdir.display());

    let unpacked_dir = unpack(tools, &source, &workdir)?;
    let spec_path = match (&source.spec, &unpacked_dir) {
        (Some(spec), _) => spec.clone(),
        (None, Some(dir)) => find_spec(dir)?,
        (None, None) => return Err(ReviewError::Source("no spec file to review".to_string())),
    };
    let spec = SpecFile::load(&spec_path)?;

    let mock = Mock::new(tools, settings.mock_config.as_deref(), &settings.mock_options);
    let (build, rpms) = build_packages(settings, &mock, &source, &workdir, cwd)?;
    let install = install_packages(settings, &mock, &build, &rpms);
    let packages = if rpms.is_empty() {
        Vec::new()
    } else if tools.is_available("rpm") {
        query_packages(tools, &rpms)?
    } else {
        warn!("rpm is not installed; package contents are unknown");
        Vec::new()
    };

    let meta = report_meta(tools, &spec, &registry);
    let inputs = ReviewInputs {
        spec,
        srpm: source.srpm.clone(),
        unpacked_dir,
        packages,
        build,
        install,
        workdir: workdir.clone(),
    };

    let results = run_checks(&registry, &inputs, tools, &settings.selection)?;
    let report = Report::build(&results, meta);
    let report_path = paths::report_file(&workdir);
    fs::write(&report_path, report.render_text())?;
    info!("Review written to {}", report_path.display());

    Ok(ReviewOutcome {
        workdir,
        report_path,
        report,
        results,
    })
}

fn unpack(tools: &dyn ToolRunner, source: &ReviewSource, workdir: &Path) -> Result<Option<PathBuf>, ReviewError> {
    let Some(srpm) = &source.srpm else {
        return Ok(None);
    };
    let dir = paths::unpacked_dir(workdir);
    clear_dir(&dir)?;
    info!("Unpacking {}", srpm.display());
    unpack_srpm(tools, srpm, &dir)?;
    Ok(Some(dir))
}

/// Remove what an earlier review left in `dir`
fn clear_dir(dir: &Path) -> Result<(), ReviewError> {
    if dir.exists() {
        debug!("Clearing {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    Ok(())
}

fn build_packages(
    settings: &ReviewSettings,
    mock: &Mock<'_>,
    source: &ReviewSource,
    workdir: &Path,
    cwd: &Path,
) -> Result<(BuildStatus, Vec<PathBuf>), ReviewError> {
    let built = match &settings.build {
        BuildMode::Skip => (BuildStatus::NotRun, Vec::new()),
        BuildMode::Prebuilt(dir) => {
            let dir = dir.as_deref().map_or_else(|| cwd.to_path_buf(), |d| cwd.join(d));
            let rpms = binary_rpms_in(&dir);
            if rpms.is_empty() {
                (BuildStatus::Failed(format!("No prebuilt rpms in {}", dir.display())), rpms)
            } else {
                info!("Using {} prebuilt package(s) from {}", rpms.len(), dir.display());
                (BuildStatus::Prebuilt, rpms)
            }
        },
        BuildMode::Mock => {
            let Some(srpm) = &source.srpm else {
                warn!("No source rpm to build; skipping build");
                return Ok((BuildStatus::NotRun, Vec::new()));
            };
            let resultdir = paths::results_dir(workdir);
            clear_dir(&resultdir)?;
            fs::create_dir_all(&resultdir)?;
            match mock.rebuild(srpm, &resultdir) {
                Ok(rpms) if rpms.is_empty() => {
                    (BuildStatus::Failed("mock produced no binary rpms".to_string()), rpms)
                },
                Ok(rpms) => (BuildStatus::Built, rpms),
                Err(e) => {
                    warn!("Build failed: {e}");
                    (BuildStatus::Failed(e.to_string()), Vec::new())
                },
            }
        },
    };
    Ok(built)
}

fn install_packages(settings: &ReviewSettings, mock: &Mock<'_>, build: &BuildStatus, rpms: &[PathBuf]) -> InstallStatus {
    let built = matches!(build, BuildStatus::Built | BuildStatus::Prebuilt);
    if !settings.install || !built {
        return InstallStatus::NotRun;
    }
    match mock.install(rpms) {
        Ok(()) => InstallStatus::Installed,
        Err(e) => {
            warn!("Install failed: {e}");
            InstallStatus::Failed(e.to_string())
        },
    }
}

fn report_meta(tools: &dyn ToolRunner, spec: &SpecFile, registry: &CheckRegistry) -> ReportMeta {
    let expanded = expand_spec(tools, &spec.path).and_then(|text| SpecFile::parse(&spec.path, &text).ok());
    let (version, release) = expanded.as_ref().map_or_else(
        || (spec.expand_resolved(spec.version()), spec.expand_resolved(spec.release())),
        |e| (e.version().to_string(), e.release().to_string()),
    );
    ReportMeta {
        package: spec.name().to_string(),
        version,
        release,
        generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        tool_version: crate::VERSION.to_string(),
        flags: registry.flags().active().map(|f| format!("{}={}", f.name, f.value())).collect(),
    }
}

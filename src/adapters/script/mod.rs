//! Shell-script plugins
//!
//! Every `*.sh` file in a plugin directory is one check. Its header
//! describes it (see [`parse_header`]); its exit status is the result:
//!
//! | status | state   |
//! |--------|---------|
//! | 80     | pass    |
//! | 81     | fail    |
//! | 82     | pending |
//! | 83     | na      |
//!
//! Standard output becomes the note. Scripts run under `bash` in the
//! review work directory with `PKGREVIEW_*` variables describing the
//! package and one `PKGREVIEW_FLAG_<NAME>` variable per active flag.

mod header;

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

pub use header::{DEFAULT_GROUP, ScriptHeaderError, parse_header};

use crate::core::models::{CheckInfo, CheckOutcome, CheckState};
use crate::core::ports::{Check, CheckContext, CheckError, ToolInvocation};
use crate::error::ReviewError;
use crate::paths;

/// Exit status for a passing script
pub const EXIT_PASS: i32 = 80;
/// Exit status for a failing script
pub const EXIT_FAIL: i32 = 81;
/// Exit status for a script that leaves the item to the reviewer
pub const EXIT_PENDING: i32 = 82;
/// Exit status for a script whose rule does not apply
pub const EXIT_NA: i32 = 83;

/// A check implemented by a shell script
#[derive(Debug, Clone)]
pub struct ScriptCheck {
    info: CheckInfo,
    path: PathBuf,
}

impl ScriptCheck {
    /// Load a script and parse its header
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        let text = fs::read_to_string(path)?;
        let info = parse_header(&text).map_err(|e| ReviewError::Plugin {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            info,
            path: path.to_path_buf(),
        })
    }

    /// Script location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn invocation(&self, ctx: &CheckContext<'_>) -> ToolInvocation {
        let inputs = ctx.inputs;
        let spec = ctx.spec();
        let optional = |p: Option<&Path>| p.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();

        let mut inv = ToolInvocation::new("bash")
            .path_arg(&self.path)
            .current_dir(ctx.workdir())
            .env("PKGREVIEW_SPEC", spec.path.to_string_lossy())
            .env("PKGREVIEW_SRPM", optional(inputs.srpm.as_deref()))
            .env("PKGREVIEW_NAME", spec.name())
            .env("PKGREVIEW_VERSION", spec.version())
            .env("PKGREVIEW_RELEASE", spec.release())
            .env("PKGREVIEW_WORKDIR", ctx.workdir().to_string_lossy())
            .env("PKGREVIEW_UNPACKED", optional(ctx.unpacked_dir()))
            .env("PKGREVIEW_RESULTDIR", paths::results_dir(ctx.workdir()).to_string_lossy());
        for flag in ctx.flags.active() {
            inv = inv.env(format!("PKGREVIEW_FLAG_{}", flag.name), flag.value());
        }
        inv
    }
}

impl Check for ScriptCheck {
    fn info(&self) -> &CheckInfo {
        &self.info
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let output = ctx.tools.run(&self.invocation(ctx))?;
        let state = match output.code {
            Some(EXIT_PASS) => CheckState::Pass,
            Some(EXIT_FAIL) => CheckState::Fail,
            Some(EXIT_PENDING) => CheckState::Pending,
            Some(EXIT_NA) => CheckState::Na,
            other => {
                return Err(CheckError::UnexpectedOutput {
                    tool: self.path.display().to_string(),
                    detail: format!(
                        "exit status {}: {}",
                        other.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                        output.stderr.trim()
                    ),
                });
            },
        };
        Ok(CheckOutcome::new(state).with_note(output.stdout.trim()))
    }
}

/// Load every `*.sh` plugin in the given directories
///
/// Directories that do not exist are skipped. Scripts load in file-name
/// order within each directory.
pub fn load_scripts(dirs: &[PathBuf]) -> Result<Vec<ScriptCheck>, ReviewError> {
    let mut checks = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            debug!("Plugin directory {} does not exist", dir.display());
            continue;
        }
        let mut scripts: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "sh"))
            .collect();
        scripts.sort();
        for script in scripts {
            let check = ScriptCheck::load(&script)?;
            debug!("Loaded plugin {} from {}", check.info.name, script.display());
            checks.push(check);
        }
    }
    Ok(checks)
}

//! System tool runner
//!
//! Runs external programs with `std::process::Command`.

use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::core::ports::{ToolError, ToolInvocation, ToolOutput, ToolRunner};

/// Runs programs on the host system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolRunner;

impl SystemToolRunner {
    /// Create a runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        // Tool output is parsed, keep it in the C locale
        cmd.env("LC_ALL", "C");
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        debug!("Running: {invocation}");
        let output = cmd.output().map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ToolError::NotFound(invocation.program.clone())
            } else {
                ToolError::Spawn {
                    program: invocation.program.clone(),
                    source,
                }
            }
        })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        find_in_path(program).is_some()
    }
}

/// Locate a program the way a shell would
#[must_use]
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let path = Path::new(program);
        return path.is_file().then(|| path.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).map(|dir| dir.join(program)).find(|candidate| candidate.is_file())
}

//! External tool port
//!
//! Defines the interface for running the external programs a review relies
//! on (`rpm`, `mock`, `rpmlint`, `rpm2cpio`, plugin scripts).

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from running an external tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// Program is not installed
    #[error("{0}: command not found")]
    NotFound(String),

    /// Program could not be started
    #[error("cannot run {program}: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Program exited unsuccessfully
    #[error("{program} exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        /// Program name
        program: String,
        /// Exit code, if the program was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

/// A program invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: Option<PathBuf>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
}

impl ToolInvocation {
    /// Start building an invocation of `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Run in a directory
    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Set an environment variable
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code (`None` when killed by a signal)
    pub code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl ToolOutput {
    /// A successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// An output with an explicit exit code
    pub fn with_code(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the program exited with status 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Non-empty stdout lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Runs external programs
///
/// A non-zero exit status is not an error for [`ToolRunner::run`]; callers
/// that require success use [`ToolRunner::run_checked`].
pub trait ToolRunner: Send + Sync + fmt::Debug {
    /// Run a program to completion, capturing its output
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;

    /// Whether a program can be found on `PATH`
    fn is_available(&self, program: &str) -> bool;

    /// Run a program and require a zero exit status
    fn run_checked(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let output = self.run(invocation)?;
        if output.success() {
            Ok(output)
        } else {
            Err(ToolError::Failed {
                program: invocation.program.clone(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

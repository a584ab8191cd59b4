//! `rpmlint` runs

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::ports::{ToolError, ToolInvocation, ToolRunner};

/// rpmlint exit statuses that still mean "ran to completion"
const COMPLETED_CODES: &[i32] = &[0, 1, 64, 66];

#[allow(clippy::expect_used)]
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) errors?, (\d+) warnings?").expect("valid rpmlint summary pattern")
});

/// Output of an rpmlint run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpmlintReport {
    /// Full output
    pub output: String,
    /// Errors reported in the summary line
    pub errors: usize,
    /// Warnings reported in the summary line
    pub warnings: usize,
}

/// Run rpmlint on the given packages
pub fn run_rpmlint(tools: &dyn ToolRunner, paths: &[PathBuf]) -> Result<RpmlintReport, ToolError> {
    let mut inv = ToolInvocation::new("rpmlint");
    for path in paths {
        inv = inv.path_arg(path);
    }
    let output = tools.run(&inv)?;
    if !output.code.is_some_and(|c| COMPLETED_CODES.contains(&c)) {
        return Err(ToolError::Failed {
            program: "rpmlint".into(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    let (errors, warnings) = parse_summary(&output.stdout).unwrap_or((0, 0));
    Ok(RpmlintReport {
        output: output.stdout,
        errors,
        warnings,
    })
}

/// Error and warning counts from rpmlint's summary line
#[must_use]
pub fn parse_summary(output: &str) -> Option<(usize, usize)> {
    let caps = SUMMARY.captures_iter(output).last()?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

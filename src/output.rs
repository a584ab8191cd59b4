//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::core::models::{CheckState, CheckType, Flag};
use crate::core::services::{CheckRegistry, Report};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Checklist marker colored by state
#[must_use]
pub fn colored_marker(state: CheckState) -> String {
    let marker = state.marker();
    match state {
        CheckState::Pass => marker.green().to_string(),
        CheckState::Fail => marker.red().bold().to_string(),
        CheckState::Na => marker.dimmed().to_string(),
        CheckState::Pending => marker.yellow().to_string(),
    }
}

/// Result of a finished review
#[derive(Debug, Serialize)]
pub struct ReviewResult {
    /// Where the report was written
    pub report_path: String,
    /// The collated report
    pub report: Report,
}

impl ReviewResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        let meta = &self.report.meta;
        println!(
            "Review of {}-{}-{}\n",
            meta.package.bold(),
            meta.version,
            meta.release
        );

        if self.report.issues.is_empty() {
            println!("{}", "No issues found.".green());
        } else {
            println!("{}", "Issues:".red().bold());
            for issue in &self.report.issues {
                println!("  {} {}", colored_marker(issue.state), issue.text);
                if let Some(note) = &issue.note {
                    for line in note.lines() {
                        println!("        {}", line.dimmed());
                    }
                }
            }
        }

        let s = self.report.summary;
        println!(
            "\n{} pass, {} fail, {} n/a, {} pending",
            s.pass.to_string().green(),
            s.fail.to_string().red(),
            s.na,
            s.pending.to_string().yellow()
        );
        println!("Review template written to {}", self.report_path.bold());
    }
}

/// One entry of `--list-checks`
#[derive(Debug, Serialize)]
pub struct CheckEntry {
    /// Check name
    pub name: String,
    /// Group
    pub group: String,
    /// Guideline strength
    #[serde(rename = "type")]
    pub kind: CheckType,
    /// Guideline text
    pub text: String,
    /// Whether the check is automatic
    pub automatic: bool,
    /// Checks it needs
    pub needs: Vec<String>,
    /// Checks it deprecates
    pub deprecates: Vec<String>,
    /// Check that replaces it when both apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_by: Option<String>,
}

/// Result of `--list-checks`
#[derive(Debug, Serialize)]
pub struct CheckListing {
    /// Registered checks, grouped and in registration order
    pub checks: Vec<CheckEntry>,
}

impl CheckListing {
    /// Collect the registered checks
    #[must_use]
    pub fn from_registry(registry: &CheckRegistry) -> Self {
        let mut checks: Vec<CheckEntry> = registry
            .iter()
            .map(|c| {
                let info = c.info();
                CheckEntry {
                    name: info.name.clone(),
                    group: info.group.clone(),
                    kind: info.kind,
                    text: info.text.clone(),
                    automatic: info.automatic,
                    needs: info.needs.clone(),
                    deprecates: info.deprecates.clone(),
                    deprecated_by: registry.deprecated_by(&info.name).map(String::from),
                }
            })
            .collect();
        let group_rank = |name: &str| registry.groups().iter().position(|g| g.name == name);
        checks.sort_by_key(|c| group_rank(&c.group));
        Self { checks }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        let mut current: Option<&str> = None;
        for check in &self.checks {
            if current != Some(check.group.as_str()) {
                if current.is_some() {
                    println!();
                }
                println!("{}:", check.group.bold());
                current = Some(check.group.as_str());
            }
            let manual = if check.automatic { "" } else { " (manual)" };
            println!("  {:<30} {:<6}{}", check.name, check.kind.to_string(), manual.dimmed());
            if !check.deprecates.is_empty() {
                println!("      deprecates: {}", check.deprecates.join(", "));
            }
            if let Some(by) = &check.deprecated_by {
                println!("      {}", format!("deprecated by {by}").dimmed());
            }
        }
    }
}

/// Result of `--display-flags`
#[derive(Debug, Serialize)]
pub struct FlagListing {
    /// Declared flags
    pub flags: Vec<Flag>,
}

impl FlagListing {
    /// Collect the declared flags
    #[must_use]
    pub fn from_registry(registry: &CheckRegistry) -> Self {
        Self {
            flags: registry.flags().iter().cloned().collect(),
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        if self.flags.is_empty() {
            println!("No flags available.");
            return;
        }
        println!("Flags:");
        for flag in &self.flags {
            let default = if flag.default.is_empty() {
                String::new()
            } else {
                format!(" [default: {}]", flag.default)
            };
            println!("  {} {}{}", format!("{:<10}", flag.name).bold(), flag.doc, default.dimmed());
        }
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}

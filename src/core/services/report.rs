//! Report collation
//!
//! Turns the engine's results into the review checklist: MUST, SHOULD and
//! EXTRA sections grouped by check group, an issues list and the
//! attachments checks produced.

use std::fmt::Write as _;

use serde::Serialize;

use super::runner::ReviewResults;
use crate::core::models::{Attachment, CheckResult, CheckState, CheckType};

/// Group listed first in every section
const PRIMARY_GROUP: &str = "Generic";

const PREAMBLE: &str = "\
This is a review *template*. Besides handling the [ ]-marked items you are
also supposed to read all of the Guidelines. Search for anything you
disagree with, check the [x]-marked items and make sure they are correct.";

/// Identification of the reviewed package and the run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportMeta {
    /// Package name
    pub package: String,
    /// Package version
    pub version: String,
    /// Package release
    pub release: String,
    /// Generation timestamp
    pub generated: String,
    /// Tool version
    pub tool_version: String,
    /// Activated flags as `NAME=value`
    pub flags: Vec<String>,
}

/// One checklist line
#[derive(Debug, Clone, Serialize)]
pub struct ReportItem {
    /// Check name
    pub name: String,
    /// Guideline text
    pub text: String,
    /// Result state
    pub state: CheckState,
    /// Reviewer note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Guideline link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&CheckResult> for ReportItem {
    fn from(result: &CheckResult) -> Self {
        Self {
            name: result.info.name.clone(),
            text: result.info.text.clone(),
            state: result.outcome.state,
            note: result.outcome.note.clone(),
            url: result.info.url.clone(),
        }
    }
}

/// Items of one group inside a section
#[derive(Debug, Clone, Serialize)]
pub struct ReportGroup {
    /// Group name
    pub name: String,
    /// Items sorted by check name
    pub items: Vec<ReportItem>,
}

/// All items of one check type
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    /// Check type of the section
    #[serde(rename = "type")]
    pub kind: CheckType,
    /// Groups, `Generic` first
    pub groups: Vec<ReportGroup>,
}

/// Counts of reported results by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Passed
    pub pass: usize,
    /// Failed
    pub fail: usize,
    /// Not applicable
    pub na: usize,
    /// Pending / manual
    pub pending: usize,
}

/// The collated review
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Package and run identification
    pub meta: ReportMeta,
    /// Failed MUST and SHOULD items
    pub issues: Vec<ReportItem>,
    /// Non-empty sections in MUST, SHOULD, EXTRA order
    pub sections: Vec<ReportSection>,
    /// Attachments sorted by order, then header
    pub attachments: Vec<Attachment>,
    /// State counts
    pub summary: Summary,
    /// Checks that did not apply
    pub not_applicable: Vec<String>,
    /// Checks replaced by other checks
    pub deprecated: Vec<String>,
}

impl Report {
    /// Collate results into a report
    #[must_use]
    pub fn build(results: &ReviewResults, meta: ReportMeta) -> Self {
        let reported: Vec<&CheckResult> = results.reported().collect();

        let mut issues: Vec<ReportItem> =
            reported.iter().filter(|r| r.is_issue()).map(|r| ReportItem::from(*r)).collect();
        issues.sort_by(|a, b| a.name.cmp(&b.name));

        let sections = CheckType::ALL
            .iter()
            .filter_map(|&kind| {
                let of_kind: Vec<&CheckResult> =
                    reported.iter().copied().filter(|r| r.info.kind == kind).collect();
                if of_kind.is_empty() {
                    None
                } else {
                    Some(ReportSection {
                        kind,
                        groups: group_items(&of_kind),
                    })
                }
            })
            .collect();

        let mut attachments: Vec<Attachment> = results
            .results
            .iter()
            .flat_map(|r| r.outcome.attachments.iter().cloned())
            .collect();
        attachments.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.header.cmp(&b.header)));

        let summary = Summary {
            pass: results.count(CheckState::Pass),
            fail: results.count(CheckState::Fail),
            na: results.count(CheckState::Na),
            pending: results.count(CheckState::Pending),
        };

        Self {
            meta,
            issues,
            sections,
            attachments,
            summary,
            not_applicable: results.not_applicable.clone(),
            deprecated: results.deprecated.clone(),
        }
    }

    /// Whether the review found issues
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Render the plain-text checklist
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{PREAMBLE}\n");
        out.push_str("Package Review\n==============\n\n");
        out.push_str("Legend:\n");
        out.push_str("[x] = Pass, [!] = Fail, [-] = Not applicable, [ ] = Manual review needed\n\n\n");

        out.push_str("Issues:\n=======\n");
        if self.issues.is_empty() {
            out.push_str("No issues found.\n");
        }
        for issue in &self.issues {
            let _ = writeln!(out, "- {}", issue.text);
            if let Some(note) = &issue.note {
                write_indented(&mut out, "  Note: ", "        ", note);
            }
            if let Some(url) = &issue.url {
                let _ = writeln!(out, "  See: {url}");
            }
        }
        out.push_str("\n\n");

        for section in &self.sections {
            let _ = writeln!(out, "===== {} items =====\n", section.kind);
            for group in &section.groups {
                let _ = writeln!(out, "{}:", group.name);
                for item in &group.items {
                    let _ = writeln!(out, "{}: {}", item.state.marker(), item.text);
                    if let Some(note) = &item.note {
                        write_indented(&mut out, "     Note: ", "     ", note);
                    }
                }
                out.push('\n');
            }
        }

        for attachment in &self.attachments {
            let _ = writeln!(out, "{}", attachment.header);
            let _ = writeln!(out, "{}", "-".repeat(attachment.header.chars().count()));
            let _ = writeln!(out, "{}\n", attachment.text.trim_end());
        }

        if !self.meta.flags.is_empty() {
            let _ = writeln!(out, "Active flags: {}", self.meta.flags.join(", "));
        }
        let _ = writeln!(
            out,
            "Generated by pkgreview {} on {}",
            self.meta.tool_version, self.meta.generated
        );
        let _ = writeln!(
            out,
            "Package: {}-{}-{}",
            self.meta.package, self.meta.version, self.meta.release
        );
        let _ = writeln!(
            out,
            "Results: {} pass, {} fail, {} n/a, {} pending",
            self.summary.pass, self.summary.fail, self.summary.na, self.summary.pending
        );
        out
    }
}

fn group_items(results: &[&CheckResult]) -> Vec<ReportGroup> {
    let mut names: Vec<&str> = results.iter().map(|r| r.info.group.as_str()).collect();
    names.sort_by(|a, b| (*a != PRIMARY_GROUP).cmp(&(*b != PRIMARY_GROUP)).then_with(|| a.cmp(b)));
    names.dedup();

    names
        .into_iter()
        .map(|group| {
            let mut items: Vec<ReportItem> = results
                .iter()
                .filter(|r| r.info.group == group)
                .map(|r| ReportItem::from(*r))
                .collect();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            ReportGroup {
                name: group.to_string(),
                items,
            }
        })
        .collect()
}

fn write_indented(out: &mut String, first: &str, rest: &str, text: &str) {
    for (i, line) in text.lines().enumerate() {
        let prefix = if i == 0 { first } else { rest };
        let _ = writeln!(out, "{prefix}{line}");
    }
}

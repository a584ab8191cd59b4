//! Check model
//!
//! A check is one packaging-guideline rule. Its static description lives in
//! [`CheckInfo`]; a run produces a [`CheckOutcome`]; the review records both
//! together as a [`CheckResult`].

use serde::{Deserialize, Serialize};

use super::{CheckState, CheckType};

/// Static metadata describing a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInfo {
    /// Unique check name (e.g., "CheckSpecName")
    pub name: String,

    /// Group the check belongs to (e.g., "Generic", "C/C++")
    pub group: String,

    /// Guideline strength
    #[serde(rename = "type")]
    pub kind: CheckType,

    /// One-line statement of the guideline
    pub text: String,

    /// Link to the guideline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether the check can decide on its own (false = manual review)
    pub automatic: bool,

    /// Checks that must complete successfully before this one runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,

    /// Checks made redundant by this one when it applies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecates: Vec<String>,
}

impl CheckInfo {
    /// Create metadata for an automatic check
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        kind: CheckType,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            kind,
            text: text.into(),
            url: None,
            automatic: true,
            needs: Vec::new(),
            deprecates: Vec::new(),
        }
    }

    /// Set the guideline link
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark the check as requiring manual review
    #[must_use]
    pub fn manual(mut self) -> Self {
        self.automatic = false;
        self
    }

    /// Declare checks this one depends on
    #[must_use]
    pub fn needs(mut self, names: &[&str]) -> Self {
        self.needs.extend(names.iter().map(|n| (*n).to_string()));
        self
    }

    /// Declare checks this one replaces
    #[must_use]
    pub fn deprecates(mut self, names: &[&str]) -> Self {
        self.deprecates.extend(names.iter().map(|n| (*n).to_string()));
        self
    }
}

/// Extra text attached to the report by a check (rpmlint output, diffs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Section header in the report
    pub header: String,
    /// Attachment body
    pub text: String,
    /// Sort key - lower comes first
    pub order: u32,
}

impl Attachment {
    /// Create a new attachment
    pub fn new(header: impl Into<String>, text: impl Into<String>, order: u32) -> Self {
        Self {
            header: header.into(),
            text: text.into(),
            order,
        }
    }
}

/// What a single check run produced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Resulting state
    pub state: CheckState,
    /// Free-text note for the reviewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Report attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl CheckOutcome {
    /// Create an outcome with the given state and no note
    #[must_use]
    pub const fn new(state: CheckState) -> Self {
        Self {
            state,
            note: None,
            attachments: Vec::new(),
        }
    }

    /// A passing outcome
    #[must_use]
    pub const fn pass() -> Self {
        Self::new(CheckState::Pass)
    }

    /// A failing outcome with an explanation
    pub fn fail(note: impl Into<String>) -> Self {
        Self::new(CheckState::Fail).with_note(note)
    }

    /// A not-applicable outcome
    #[must_use]
    pub const fn na() -> Self {
        Self::new(CheckState::Na)
    }

    /// A pending outcome (left for manual review)
    #[must_use]
    pub const fn pending() -> Self {
        Self::new(CheckState::Pending)
    }

    /// Pass when `ok`, otherwise fail with `note`
    pub fn pass_if(ok: bool, note: impl Into<String>) -> Self {
        if ok { Self::pass() } else { Self::fail(note) }
    }

    /// Attach a note
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    /// Attach report text
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A check's metadata together with its recorded outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check metadata
    #[serde(flatten)]
    pub info: CheckInfo,
    /// Recorded outcome
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    /// Whether the result appears in the report
    pub reported: bool,
}

impl CheckResult {
    /// Record an outcome for a check
    #[must_use]
    pub const fn new(info: CheckInfo, outcome: CheckOutcome, reported: bool) -> Self {
        Self {
            info,
            outcome,
            reported,
        }
    }

    /// Shortcut to the check name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Shortcut to the recorded state
    #[must_use]
    pub const fn state(&self) -> CheckState {
        self.outcome.state
    }

    /// Whether the result is a review issue (failed MUST or SHOULD item)
    #[must_use]
    pub const fn is_issue(&self) -> bool {
        matches!(self.outcome.state, CheckState::Fail) && self.info.kind.is_blocking()
    }
}

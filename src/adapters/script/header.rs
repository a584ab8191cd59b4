//! Plugin script headers
//!
//! A script describes itself in `# @key: value` lines of its leading
//! comment block. Reading stops at the first line that is neither blank
//! nor a comment, so comments in the script body are never metadata.
//!
//! ```text
//! # @name: CheckMyRule
//! # @group: Generic
//! # @type: MUST
//! # @text: What the rule asserts
//! # @url: https://example.org/guideline
//! # @needs: CheckBuild
//! # @deprecates: CheckOldRule
//! ```

use thiserror::Error;

use crate::core::models::{CheckInfo, CheckType};

/// Group used when a script does not name one
pub const DEFAULT_GROUP: &str = "Generic";

/// Errors in a script header
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptHeaderError {
    /// A required key is absent
    #[error("missing @{0}")]
    Missing(&'static str),

    /// `@type` is not MUST/SHOULD/EXTRA
    #[error("invalid @type: {0}")]
    InvalidType(String),

    /// A key that is not part of the plugin API
    #[error("unknown key @{0}")]
    UnknownKey(String),
}

/// Parse the header of a plugin script into check metadata
pub fn parse_header(text: &str) -> Result<CheckInfo, ScriptHeaderError> {
    let mut name = None;
    let mut group = None;
    let mut kind = CheckType::Extra;
    let mut text_line = None;
    let mut url = None;
    let mut needs = Vec::new();
    let mut deprecates = Vec::new();

    let header = text.lines().map(str::trim_start).take_while(|l| l.is_empty() || l.starts_with('#'));
    for line in header {
        let Some(rest) = line.strip_prefix('#') else {
            continue;
        };
        let Some(rest) = rest.trim_start().strip_prefix('@') else {
            continue;
        };
        let Some((key, value)) = rest.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "name" => name = Some(value.to_string()),
            "group" => group = Some(value.to_string()),
            "type" => kind = value.parse().map_err(|_| ScriptHeaderError::InvalidType(value.to_string()))?,
            "text" => text_line = Some(value.to_string()),
            "url" => url = Some(value.to_string()),
            "needs" => needs.extend(split_list(value)),
            "deprecates" => deprecates.extend(split_list(value)),
            other => return Err(ScriptHeaderError::UnknownKey(other.to_string())),
        }
    }

    let mut info = CheckInfo::new(
        name.filter(|n| !n.is_empty()).ok_or(ScriptHeaderError::Missing("name"))?,
        group.unwrap_or_else(|| DEFAULT_GROUP.to_string()),
        kind,
        text_line.filter(|t| !t.is_empty()).ok_or(ScriptHeaderError::Missing("text"))?,
    );
    info.url = url;
    info.needs = needs;
    info.deprecates = deprecates;
    Ok(info)
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

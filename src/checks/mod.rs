//! Built-in checks
//!
//! Checks are registered per group:
//! - `generic` - applies to every package (flags `EPEL7`, `DISTTAG`)
//! - `ccpp` - packages shipping C/C++ libraries or headers
//! - `python` - Python packages
//!
//! Most built-in rules are plain functions wrapped in a [`RuleCheck`].

pub mod ccpp;
pub mod generic;
pub mod python;

use std::fmt;

use crate::core::models::{CheckInfo, CheckOutcome};
use crate::core::ports::{Check, CheckContext, CheckError};
use crate::core::services::CheckRegistry;
use crate::error::ReviewError;

/// Packaging guidelines root
pub const GUIDELINES: &str = "https://docs.fedoraproject.org/en-US/packaging-guidelines/";

/// Rule body of a built-in check
pub type Rule = fn(&CheckContext<'_>) -> Result<CheckOutcome, CheckError>;

/// Per-check applicability test
pub type Applies = fn(&CheckContext<'_>) -> bool;

/// A check whose body is a plain function
#[derive(Clone)]
pub struct RuleCheck {
    info: CheckInfo,
    rule: Rule,
    applies: Option<Applies>,
}

impl RuleCheck {
    /// An automatic check evaluated by `rule`
    #[must_use]
    pub const fn new(info: CheckInfo, rule: Rule) -> Self {
        Self {
            info,
            rule,
            applies: None,
        }
    }

    /// A check the reviewer has to judge
    #[must_use]
    pub fn manual(info: CheckInfo) -> Self {
        Self::new(info.manual(), left_to_reviewer)
    }

    /// Restrict the check with its own applicability test
    #[must_use]
    pub fn applicable_when(mut self, applies: Applies) -> Self {
        self.applies = Some(applies);
        self
    }

    /// Box for registration
    #[must_use]
    pub fn boxed(self) -> Box<dyn Check> {
        Box::new(self)
    }
}

fn left_to_reviewer(_ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    Ok(CheckOutcome::pending())
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCheck")
            .field("name", &self.info.name)
            .field("group", &self.info.group)
            .finish_non_exhaustive()
    }
}

impl Check for RuleCheck {
    fn info(&self) -> &CheckInfo {
        &self.info
    }

    fn is_applicable(&self, ctx: &CheckContext<'_>) -> bool {
        self.applies.is_none_or(|applies| applies(ctx))
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        (self.rule)(ctx)
    }
}

/// Register every built-in group and check
pub fn register_builtin(registry: &mut CheckRegistry) -> Result<(), ReviewError> {
    registry.add_group(generic::group())?;
    registry.register_all(generic::checks())?;
    registry.add_group(ccpp::group())?;
    registry.register_all(ccpp::checks())?;
    registry.add_group(python::group())?;
    registry.register_all(python::checks())?;
    Ok(())
}

/// Guideline link for a page below [`GUIDELINES`]
#[must_use]
pub fn guideline(page: &str) -> String {
    format!("{GUIDELINES}{page}")
}

/// Bulleted list used in notes
#[must_use]
pub fn bullet_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: fmt::Display,
{
    items.into_iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
}

/// Whether a path is a shared library (`libfoo.so` or `libfoo.so.1.2`)
#[must_use]
pub fn is_shared_library(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.ends_with(".so") || file.contains(".so.")
}

/// Whether a path is an unversioned development library symlink (`libfoo.so`)
#[must_use]
pub fn is_unversioned_so(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.starts_with("lib") && file.ends_with(".so") && in_lib_dir(path)
}

/// Whether a path lives directly in a system library directory
#[must_use]
pub fn in_lib_dir(path: &str) -> bool {
    ["/usr/lib/", "/usr/lib64/", "/lib/", "/lib64/"].iter().any(|dir| {
        path.strip_prefix(dir).is_some_and(|rest| !rest.contains('/'))
    })
}

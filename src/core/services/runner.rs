//! Run engine
//!
//! Decides which registered checks run, in what order, and records one
//! result per executed check:
//!
//! 1. applicability (group test and the check's own test)
//! 2. deprecation (a check replaces the checks it deprecates)
//! 3. selection (`only` / `exclude`)
//! 4. dependency ordering
//! 5. sequential execution, skipping checks whose dependencies did not pass

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use log::{debug, error, info, warn};
use serde::Serialize;

use super::ordering::stable_topological_order;
use super::registry::CheckRegistry;
use crate::core::models::{CheckOutcome, CheckResult, CheckState};
use crate::core::ports::{Check, CheckContext, ReviewInputs, ToolRunner};
use crate::error::ReviewError;

/// Which checks the user asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Run only these checks (plus whatever they need); empty = all
    pub only: Vec<String>,
    /// Never run these checks
    pub exclude: Vec<String>,
}

impl Selection {
    /// Select every check
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }
}

/// Everything the engine recorded
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewResults {
    /// Results in execution order
    pub results: Vec<CheckResult>,
    /// Checks that did not apply to the package
    pub not_applicable: Vec<String>,
    /// Checks replaced by a deprecating check
    pub deprecated: Vec<String>,
    /// Checks removed by the selection
    pub excluded: Vec<String>,
}

impl ReviewResults {
    /// Result of a check, if it ran
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name() == name)
    }

    /// Results that appear in the report
    pub fn reported(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.reported)
    }

    /// Number of reported results in a state
    #[must_use]
    pub fn count(&self, state: CheckState) -> usize {
        self.reported().filter(|r| r.state() == state).count()
    }

    /// Whether any reported result is a review issue
    #[must_use]
    pub fn has_issues(&self) -> bool {
        self.reported().any(CheckResult::is_issue)
    }
}

/// Why a dependency keeps a check from running
enum Blocker {
    Excluded,
    NotRun,
    State(CheckState),
}

impl std::fmt::Display for Blocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded"),
            Self::NotRun => write!(f, "not run"),
            Self::State(state) => write!(f, "{state}"),
        }
    }
}

/// Run the registered checks against the review inputs
pub fn run_checks(
    registry: &CheckRegistry,
    inputs: &ReviewInputs,
    tools: &dyn ToolRunner,
    selection: &Selection,
) -> Result<ReviewResults, ReviewError> {
    registry.validate()?;
    for name in selection.only.iter().chain(&selection.exclude) {
        if !registry.contains(name) {
            return Err(ReviewError::UnknownCheck(name.clone()));
        }
    }

    let ctx = CheckContext::new(inputs, registry.flags(), tools);
    let checks: Vec<&dyn Check> = registry.iter().collect();
    let name_at = |idx: usize| checks[idx].info().name.as_str();
    let mut results = ReviewResults::default();

    // Applicability
    let mut applicable: Vec<usize> = Vec::new();
    for (idx, check) in checks.iter().enumerate() {
        let info = check.info();
        let group_applies = registry.group(&info.group).is_none_or(|g| (g.applies)(&ctx));
        if group_applies && check.is_applicable(&ctx) {
            applicable.push(idx);
        } else {
            debug!("{} does not apply", info.name);
            results.not_applicable.push(info.name.clone());
        }
    }
    let applicable_names: BTreeSet<&str> =
        applicable.iter().map(|&i| name_at(i)).collect();

    // Deprecation, first registered deprecator wins
    let mut redirects: HashMap<&str, &str> = HashMap::new();
    for &idx in &applicable {
        let info = checks[idx].info();
        if redirects.contains_key(info.name.as_str()) {
            continue;
        }
        for old in &info.deprecates {
            if old != &info.name
                && applicable_names.contains(old.as_str())
                && !redirects.contains_key(old.as_str())
            {
                debug!("{} deprecates {}", info.name, old);
                redirects.insert(old.as_str(), info.name.as_str());
            }
        }
    }
    let resolve = |name: &str| -> String {
        let mut current = name;
        let mut hops = 0;
        while let Some(&next) = redirects.get(current) {
            current = next;
            hops += 1;
            if hops > redirects.len() {
                break;
            }
        }
        current.to_string()
    };

    let mut run_set: BTreeSet<usize> = BTreeSet::new();
    for &idx in &applicable {
        let name = name_at(idx);
        if redirects.contains_key(name) {
            results.deprecated.push(name.to_string());
        } else {
            run_set.insert(idx);
        }
    }

    // Selection
    let reported: Option<BTreeSet<String>> = if selection.only.is_empty() {
        None
    } else {
        let wanted: BTreeSet<String> = selection.only.iter().map(|n| resolve(n)).collect();
        let closure = needs_closure(registry, &wanted, &resolve);
        run_set.retain(|&idx| closure.contains(name_at(idx)));
        for name in &wanted {
            if !registry.index_of(name).is_some_and(|i| run_set.contains(&i)) {
                warn!("Selected check {name} does not apply to this package");
            }
        }
        Some(wanted)
    };

    let excluded: BTreeSet<&str> = selection.exclude.iter().map(String::as_str).collect();
    run_set.retain(|&idx| {
        let name = name_at(idx);
        if excluded.contains(name) {
            results.excluded.push(name.to_string());
            false
        } else {
            true
        }
    });

    // Ordering
    let nodes: BTreeMap<usize, Vec<usize>> = run_set
        .iter()
        .map(|&idx| {
            let deps = checks[idx]
                .info()
                .needs
                .iter()
                .filter_map(|n| registry.index_of(&resolve(n)))
                .collect();
            (idx, deps)
        })
        .collect();
    let order = stable_topological_order(&nodes).map_err(|cycle| {
        ReviewError::DependencyCycle(
            cycle.into_iter().map(|i| name_at(i).to_string()).collect(),
        )
    })?;

    // Execution
    info!("Running {} checks", order.len());
    let mut states: HashMap<String, CheckState> = HashMap::new();
    for idx in order {
        let check = checks[idx];
        let info = check.info();

        let blocker = info.needs.iter().find_map(|need| {
            let target = resolve(need);
            if results.not_applicable.contains(&target) {
                return None;
            }
            match states.get(&target) {
                Some(state) if state.satisfies_dependents() => None,
                Some(state) => Some((target, Blocker::State(*state))),
                None if excluded.contains(target.as_str()) => Some((target, Blocker::Excluded)),
                None => Some((target, Blocker::NotRun)),
            }
        });

        let outcome = if let Some((dep, reason)) = blocker {
            warn!("Skipping {}: depends on {dep} ({reason})", info.name);
            CheckOutcome::pending().with_note(format!("Not run: depends on {dep} ({reason})"))
        } else if !info.automatic {
            debug!("{} needs manual review", info.name);
            CheckOutcome::pending()
        } else {
            debug!("Running {}", info.name);
            match check.run(&ctx) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{}: {e}", info.name);
                    CheckOutcome::pending().with_note(format!("Check error: {e}"))
                },
            }
        };

        debug!("{} -> {}", info.name, outcome.state);
        states.insert(info.name.clone(), outcome.state);
        let is_reported = reported.as_ref().is_none_or(|r| r.contains(&info.name));
        results.results.push(CheckResult::new(info.clone(), outcome, is_reported));
    }

    Ok(results)
}

/// Names of `wanted` plus everything they transitively need
fn needs_closure(
    registry: &CheckRegistry,
    wanted: &BTreeSet<String>,
    resolve: &dyn Fn(&str) -> String,
) -> BTreeSet<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = wanted.iter().cloned().collect();
    while let Some(name) = queue.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        if let Some(check) = registry.get(&name) {
            queue.extend(check.info().needs.iter().map(|n| resolve(n)));
        }
    }
    seen
}

//! Tests for the run engine: applicability, deprecation, selection,
//! ordering and dependency blocking

use pkgreview::core::models::{CheckOutcome, CheckState, CheckType};
use pkgreview::core::services::{Selection, run_checks};
use pkgreview::error::ReviewError;

use crate::common::{MockToolRunner, StubCheck, inputs_for, registry_of};

const SPEC: &str = "Name: foo\nVersion: 1\nRelease: 1\n";

fn names(results: &pkgreview::core::services::ReviewResults) -> Vec<&str> {
    results.results.iter().map(|r| r.name()).collect()
}

fn only(names: &[&str]) -> Selection {
    Selection {
        only: names.iter().map(|n| (*n).to_string()).collect(),
        exclude: Vec::new(),
    }
}

fn exclude(names: &[&str]) -> Selection {
    Selection {
        only: Vec::new(),
        exclude: names.iter().map(|n| (*n).to_string()).collect(),
    }
}

// =============================================================================
// ORDERING
// =============================================================================

#[test]
fn test_registration_order_without_dependencies() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![StubCheck::new("C"), StubCheck::new("A"), StubCheck::new("B")]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(names(&results), vec!["C", "A", "B"]);
}

#[test]
fn test_dependencies_run_first() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Late").needs(&["Base"]),
        StubCheck::new("Other"),
        StubCheck::new("Base"),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(names(&results), vec!["Other", "Base", "Late"]);
    assert_eq!(results.get("Late").unwrap().state(), CheckState::Pass);
}

#[test]
fn test_unknown_dependency_is_an_error() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![StubCheck::new("A").needs(&["Missing"])]);
    let err = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap_err();
    assert!(matches!(
        err,
        ReviewError::UnknownDependency { ref check, ref needs } if check == "A" && needs == "Missing"
    ));
}

#[test]
fn test_cycle_is_an_error() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("A").needs(&["B"]),
        StubCheck::new("B").needs(&["A"]),
    ]);
    let err = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap_err();
    let ReviewError::DependencyCycle(cycle) = err else {
        panic!("expected a dependency cycle");
    };
    assert!(cycle.contains(&"A".to_string()));
    assert!(cycle.contains(&"B".to_string()));
}

// =============================================================================
// BLOCKING
// =============================================================================

#[test]
fn test_failed_dependency_blocks() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Build").outcome(CheckOutcome::fail("broken")),
        StubCheck::new("Install").needs(&["Build"]),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    let install = results.get("Install").unwrap();
    assert_eq!(install.state(), CheckState::Pending);
    assert_eq!(install.outcome.note.as_deref(), Some("Not run: depends on Build (fail)"));
}

#[test]
fn test_pending_dependency_blocks() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Manual").manual(),
        StubCheck::new("After").needs(&["Manual"]),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(results.get("Manual").unwrap().state(), CheckState::Pending);
    assert_eq!(
        results.get("After").unwrap().outcome.note.as_deref(),
        Some("Not run: depends on Manual (pending)")
    );
}

#[test]
fn test_na_and_inapplicable_dependencies_do_not_block() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Na").outcome(CheckOutcome::na()),
        StubCheck::new("Skipped").not_applicable(),
        StubCheck::new("Dependent").needs(&["Na", "Skipped"]),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(results.get("Dependent").unwrap().state(), CheckState::Pass);
    assert_eq!(results.not_applicable, vec!["Skipped"]);
    assert!(results.get("Skipped").is_none());
}

#[test]
fn test_excluded_dependency_blocks() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![StubCheck::new("Build"), StubCheck::new("Install").needs(&["Build"])]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &exclude(&["Build"])).unwrap();
    assert_eq!(results.excluded, vec!["Build"]);
    assert_eq!(
        results.get("Install").unwrap().outcome.note.as_deref(),
        Some("Not run: depends on Build (excluded)")
    );
}

#[test]
fn test_check_error_is_recorded_pending() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![StubCheck::new("Flaky").failing_with("no rpmlint")]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    let flaky = results.get("Flaky").unwrap();
    assert_eq!(flaky.state(), CheckState::Pending);
    assert_eq!(flaky.outcome.note.as_deref(), Some("Check error: missing input: no rpmlint"));
}

#[test]
fn test_manual_check_is_pending_without_running() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![StubCheck::new("Eyes").manual().outcome(CheckOutcome::fail("never seen"))]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    let eyes = results.get("Eyes").unwrap();
    assert_eq!(eyes.state(), CheckState::Pending);
    assert_eq!(eyes.outcome.note, None);
}

// =============================================================================
// DEPRECATION
// =============================================================================

#[test]
fn test_deprecated_check_is_replaced() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Old"),
        StubCheck::new("New").deprecates(&["Old"]),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(names(&results), vec!["New"]);
    assert_eq!(results.deprecated, vec!["Old"]);
}

#[test]
fn test_inapplicable_deprecator_keeps_old_check() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Old"),
        StubCheck::new("New").deprecates(&["Old"]).not_applicable(),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(names(&results), vec!["Old"]);
    assert!(results.deprecated.is_empty());
}

#[test]
fn test_needs_on_deprecated_check_follow_the_deprecator() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("User").needs(&["Old"]),
        StubCheck::new("Old"),
        StubCheck::new("New").deprecates(&["Old"]).outcome(CheckOutcome::fail("bad")),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(names(&results), vec!["New", "User"]);
    assert_eq!(
        results.get("User").unwrap().outcome.note.as_deref(),
        Some("Not run: depends on New (fail)")
    );
}

#[test]
fn test_first_registered_deprecator_wins() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Old"),
        StubCheck::new("First").deprecates(&["Old"]),
        StubCheck::new("Second").deprecates(&["Old"]),
        StubCheck::new("User").needs(&["Old"]).outcome(CheckOutcome::pass()),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(results.deprecated, vec!["Old"]);
    assert_eq!(names(&results), vec!["First", "Second", "User"]);
}

#[test]
fn test_excluded_deprecator_still_replaces_old_check() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Old"),
        StubCheck::new("New").deprecates(&["Old"]),
        StubCheck::new("User").needs(&["Old"]),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &exclude(&["New"])).unwrap();
    assert_eq!(names(&results), vec!["User"]);
    assert_eq!(results.deprecated, vec!["Old"]);
    assert_eq!(results.excluded, vec!["New"]);
    assert_eq!(
        results.get("User").unwrap().outcome.note.as_deref(),
        Some("Not run: depends on New (excluded)")
    );
}

// =============================================================================
// SELECTION
// =============================================================================

#[test]
fn test_only_runs_needs_closure_but_reports_selection() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Build"),
        StubCheck::new("Lint").needs(&["Build"]),
        StubCheck::new("Unrelated"),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &only(&["Lint"])).unwrap();
    assert_eq!(names(&results), vec!["Build", "Lint"]);
    let reported: Vec<&str> = results.reported().map(|r| r.name()).collect();
    assert_eq!(reported, vec!["Lint"]);
}

#[test]
fn test_unknown_selected_check_is_an_error() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![StubCheck::new("A")]);
    for selection in [only(&["Nope"]), exclude(&["Nope"])] {
        let err = run_checks(&registry, &inputs, &MockToolRunner::new(), &selection).unwrap_err();
        assert!(matches!(err, ReviewError::UnknownCheck(ref n) if n == "Nope"));
    }
}

#[test]
fn test_group_applicability_applies_to_members() {
    let (_dir, inputs) = inputs_for(SPEC);
    let mut registry = registry_of(vec![]);
    registry
        .add_group(pkgreview::core::ports::Group::new("Never").applicable_when(|_| false))
        .unwrap();
    registry.register(StubCheck::new("Hidden").group("Never").boxed()).unwrap();
    registry
        .register(StubCheck::new("Shown").kind(CheckType::Should).boxed())
        .unwrap();
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert_eq!(names(&results), vec!["Shown"]);
    assert_eq!(results.not_applicable, vec!["Hidden"]);
}

#[test]
fn test_issue_counting() {
    let (_dir, inputs) = inputs_for(SPEC);
    let registry = registry_of(vec![
        StubCheck::new("Must").outcome(CheckOutcome::fail("x")),
        StubCheck::new("Extra").kind(CheckType::Extra).outcome(CheckOutcome::fail("y")),
    ]);
    let results = run_checks(&registry, &inputs, &MockToolRunner::new(), &Selection::all()).unwrap();
    assert!(results.has_issues());
    assert_eq!(results.count(CheckState::Fail), 2);
    assert!(results.get("Must").unwrap().is_issue());
    assert!(!results.get("Extra").unwrap().is_issue());
}

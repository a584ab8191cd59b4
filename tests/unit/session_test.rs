//! Tests for end-to-end review runs with scripted tools

use std::fs;

use pkgreview::ReviewError;
use pkgreview::core::models::CheckState;
use pkgreview::core::ports::ToolOutput;
use pkgreview::session::{BuildMode, ReviewSettings, run_review};
use pkgreview::source::SourceRequest;
use tempfile::TempDir;

use crate::common::{LIB_SPEC, MockToolRunner};

fn spec_review(dir: &TempDir, build: BuildMode) -> ReviewSettings {
    let spec = dir.path().join("libfoo.spec");
    fs::write(&spec, LIB_SPEC).unwrap();
    ReviewSettings {
        source: SourceRequest {
            spec: Some(spec),
            ..SourceRequest::default()
        },
        build,
        ..ReviewSettings::default()
    }
}

#[test]
fn test_spec_review_writes_report_into_workdir() {
    let dir = TempDir::new().unwrap();
    let settings = spec_review(&dir, BuildMode::Skip);
    let tools = MockToolRunner::new()
        .respond("rpmspec -P", ToolOutput::ok(LIB_SPEC.replace("1%{?dist}", "1.fc41")));

    let outcome = run_review(&settings, &tools, dir.path()).unwrap();

    assert_eq!(outcome.workdir, dir.path().join("libfoo-review"));
    assert_eq!(outcome.report_path, dir.path().join("libfoo-review/review.txt"));
    assert!(dir.path().join("libfoo-review/results").is_dir());
    let text = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(text.contains("Package: libfoo-1.0-1.fc41"));
    assert_eq!(outcome.report.meta.release, "1.fc41");
    assert_eq!(outcome.results.get("CheckBuild").unwrap().state(), CheckState::Na);
    assert!(!outcome.report.has_issues());
}

#[test]
fn test_explicit_workdir_and_parent() {
    let dir = TempDir::new().unwrap();
    let mut settings = spec_review(&dir, BuildMode::Skip);
    settings.workdir_parent = Some(dir.path().join("reviews"));
    let outcome = run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap();
    assert_eq!(outcome.workdir, dir.path().join("reviews/libfoo-review"));

    settings.workdir = Some(dir.path().join("here"));
    let outcome = run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap();
    assert_eq!(outcome.workdir, dir.path().join("here"));
    assert!(dir.path().join("here/review.txt").is_file());
}

#[test]
fn test_prebuilt_packages_are_queried() {
    let dir = TempDir::new().unwrap();
    let rpms = dir.path().join("rpms");
    fs::create_dir_all(&rpms).unwrap();
    fs::write(rpms.join("libfoo-1.0-1.x86_64.rpm"), "").unwrap();
    fs::write(rpms.join("libfoo-1.0-1.src.rpm"), "").unwrap();
    let settings = spec_review(&dir, BuildMode::Prebuilt(Some(rpms)));

    let tools = MockToolRunner::new()
        .respond("rpm -qp --qf", ToolOutput::ok("libfoo"))
        .respond("rpm -qp -l", ToolOutput::ok("/usr/lib64/libfoo.so.1\n/usr/lib64/libfoo.so\n"));
    let outcome = run_review(&settings, &tools, dir.path()).unwrap();

    assert_eq!(outcome.results.get("CheckBuild").unwrap().state(), CheckState::Pass);
    assert_eq!(outcome.results.get("CheckInstall").unwrap().state(), CheckState::Na);
    assert_eq!(outcome.results.get("CheckSoFiles").unwrap().state(), CheckState::Fail);
    assert!(!tools.calls().iter().any(|c| c.contains(".src.rpm")));
}

#[test]
fn test_prebuilt_without_rpms_fails_build() {
    let dir = TempDir::new().unwrap();
    let settings = spec_review(&dir, BuildMode::Prebuilt(None));
    let outcome = run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap();

    let build = outcome.results.get("CheckBuild").unwrap();
    assert_eq!(build.state(), CheckState::Fail);
    assert!(build.outcome.note.as_deref().unwrap().starts_with("No prebuilt rpms in"));
    assert!(outcome.report.has_issues());
}

#[test]
fn test_mock_build_failure_is_recorded() {
    let dir = TempDir::new().unwrap();
    let srpm = dir.path().join("libfoo-1.0-1.fc41.src.rpm");
    fs::write(&srpm, "").unwrap();
    let mut settings = spec_review(&dir, BuildMode::Mock);
    settings.source.srpm = Some(srpm);
    settings.mock_config = Some("fedora-41-x86_64".into());
    settings.install = true;

    let tools = MockToolRunner::new()
        .with_program("sh")
        .respond("mock", ToolOutput::with_code(30, ""));
    let outcome = run_review(&settings, &tools, dir.path()).unwrap();

    let calls = tools.calls();
    assert!(calls.iter().any(|c| c.starts_with("mock -r fedora-41-x86_64 --rebuild")));
    assert!(!calls.iter().any(|c| c.contains("--install")));
    assert!(matches!(
        outcome.results.get("CheckBuild").map(|r| r.state()),
        Some(CheckState::Fail)
    ));
    assert_eq!(
        outcome.results.get("CheckInstall").unwrap().outcome.note.as_deref(),
        Some("Not run: depends on CheckBuild (fail)")
    );
    assert!(outcome.workdir.join("srpm-unpacked").is_dir());
}

#[test]
fn test_missing_source_is_an_error() {
    let dir = TempDir::new().unwrap();
    let settings = ReviewSettings {
        source: SourceRequest {
            spec: Some(dir.path().join("nope.spec")),
            ..SourceRequest::default()
        },
        build: BuildMode::Skip,
        ..ReviewSettings::default()
    };
    let err = run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap_err();
    assert!(matches!(err, ReviewError::Source(msg) if msg.contains("nope.spec")));
}

#[test]
fn test_excluded_check_blocks_dependents() {
    let dir = TempDir::new().unwrap();
    let mut settings = spec_review(&dir, BuildMode::Skip);
    settings.selection.exclude = vec!["CheckBuild".into()];
    let outcome = run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap();
    assert!(outcome.results.excluded.contains(&"CheckBuild".to_string()));
    assert_eq!(
        outcome.results.get("CheckInstall").unwrap().outcome.note.as_deref(),
        Some("Not run: depends on CheckBuild (excluded)")
    );
}


#[test]
fn test_mock_rebuild_ignores_stale_results() {
    let dir = TempDir::new().unwrap();
    let srpm = dir.path().join("libfoo-1.0-1.fc41.src.rpm");
    fs::write(&srpm, "").unwrap();
    let stale = dir.path().join("libfoo-review/results/libfoo-0.9-1.x86_64.rpm");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "").unwrap();
    let mut settings = spec_review(&dir, BuildMode::Mock);
    settings.source.srpm = Some(srpm);

    let tools = MockToolRunner::new().with_program("sh").with_program("mock");
    let outcome = run_review(&settings, &tools, dir.path()).unwrap();

    assert!(!stale.exists());
    assert!(dir.path().join("libfoo-review/results").is_dir());
    assert!(!tools.calls().iter().any(|c| c.contains("libfoo-0.9")));
    let build = outcome.results.get("CheckBuild").unwrap();
    assert_eq!(build.state(), CheckState::Fail);
    assert_eq!(build.outcome.note.as_deref(), Some("mock produced no binary rpms"));
}

#[test]
fn test_skipped_build_keeps_results() {
    let dir = TempDir::new().unwrap();
    let kept = dir.path().join("libfoo-review/results/build.log");
    fs::create_dir_all(kept.parent().unwrap()).unwrap();
    fs::write(&kept, "").unwrap();
    let settings = spec_review(&dir, BuildMode::Skip);
    run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap();
    assert!(kept.is_file());
}

#[test]
fn test_report_release_without_rpmspec_drops_dist() {
    let dir = TempDir::new().unwrap();
    let settings = spec_review(&dir, BuildMode::Skip);
    let outcome = run_review(&settings, &MockToolRunner::new(), dir.path()).unwrap();
    assert_eq!(outcome.report.meta.version, "1.0");
    assert_eq!(outcome.report.meta.release, "1");
    let text = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(text.contains("Package: libfoo-1.0-1\n"));
}

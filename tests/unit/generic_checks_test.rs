//! Tests for the Generic checks

use std::fs;

use pkgreview::core::models::{BuildStatus, CheckState, InstallStatus};
use pkgreview::core::ports::ToolOutput;
use pkgreview::core::services::ReviewResults;

use crate::common::{LIB_SPEC, MockToolRunner, inputs_for, lib_packages, run_builtin, spec_in};

const BAD_SPEC: &str = "\
Name:           bar
Version:        2.0
Release:        1
Summary:        Bar
URL:            https://example.org/bar
Source0:        bar-2.0.tar.gz
BuildRoot:      %{_tmppath}/%{name}-%{version}-root

%description
Bar.

%install
mkdir -p $RPM_BUILD_ROOT/usr/bin
install -m755 bar %{buildroot}/usr/bin/bar

%clean
rm -rf $RPM_BUILD_ROOT

%files
%defattr(-,root,root,-)
/usr/bin/bar

%changelog
* 2024-01-01 Someone
- init
";

fn state(results: &ReviewResults, name: &str) -> CheckState {
    results.get(name).unwrap_or_else(|| panic!("{name} did not run")).state()
}

fn note<'a>(results: &'a ReviewResults, name: &str) -> &'a str {
    results.get(name).and_then(|r| r.outcome.note.as_deref()).unwrap_or_default()
}

fn clean_rpmlint() -> MockToolRunner {
    MockToolRunner::new().respond(
        "rpmlint",
        ToolOutput::ok("2 packages and 0 specfiles checked; 0 errors, 0 warnings.\n"),
    )
}

// =============================================================================
// WELL-FORMED PACKAGE
// =============================================================================

#[test]
fn test_good_library_passes_generic_checks() {
    let (_dir, mut inputs) = inputs_for(LIB_SPEC);
    inputs.packages = lib_packages();
    inputs.build = BuildStatus::Built;
    inputs.install = InstallStatus::Installed;

    let results = run_builtin(&inputs, &clean_rpmlint(), &[]);

    for name in [
        "CheckBuild",
        "CheckInstall",
        "CheckRpmlint",
        "CheckSpecName",
        "CheckLicenseField",
        "CheckLicenseInDocs",
        "CheckBuildroot",
        "CheckClean",
        "CheckDefattr",
        "CheckMacros",
        "CheckChangelog",
        "CheckDistTag",
        "CheckSourceUrl",
        "CheckFullVerReqSub",
    ] {
        assert_eq!(state(&results, name), CheckState::Pass, "{name}: {}", note(&results, name));
    }
    for name in ["CheckNaming", "CheckLicenseCorrect", "CheckOwnDirs", "CheckSourceMatchesUpstream"] {
        assert_eq!(state(&results, name), CheckState::Pending);
    }
    assert!(results.not_applicable.contains(&"CheckSpecInSrpm".to_string()));
    assert!(results.not_applicable.contains(&"CheckLicensecheck".to_string()));
    assert!(results.deprecated.contains(&"CheckDevelFilesInDevel".to_string()));
    assert!(!results.has_issues());
}

// =============================================================================
// GUIDELINE VIOLATIONS
// =============================================================================

#[test]
fn test_bad_spec_fails_spec_checks() {
    let (_dir, inputs) = inputs_for(BAD_SPEC);
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);

    for name in [
        "CheckLicenseField",
        "CheckBuildroot",
        "CheckClean",
        "CheckDefattr",
        "CheckMacros",
        "CheckChangelog",
        "CheckDistTag",
        "CheckSourceUrl",
    ] {
        assert_eq!(state(&results, name), CheckState::Fail, "{name}");
    }
    assert!(note(&results, "CheckBuildroot").contains("line 7"));
    assert!(note(&results, "CheckMacros").contains("$RPM_BUILD_ROOT used 2 times"));
    assert!(note(&results, "CheckChangelog").contains("* 2024-01-01 Someone"));
    assert!(note(&results, "CheckSourceUrl").contains("Source0: bar-2.0.tar.gz"));
    assert_eq!(state(&results, "CheckFullVerReqSub"), CheckState::Na);
    assert_eq!(state(&results, "CheckLicenseInDocs"), CheckState::Pending);
    assert!(results.has_issues());
}

#[test]
fn test_spec_name_must_match_package() {
    let dir = tempfile::TempDir::new().unwrap();
    let spec = spec_in(dir.path(), "wrong", LIB_SPEC);
    let inputs = pkgreview::core::ports::ReviewInputs::from_spec(spec, dir.path());
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckSpecName"), CheckState::Fail);
    assert_eq!(note(&results, "CheckSpecName"), "Spec file is wrong.spec, expected libfoo.spec");
}

#[test]
fn test_hard_coded_disttag_uses_flag_value() {
    let text = LIB_SPEC.replace("1%{?dist}", "1.el9");
    let (_dir, inputs) = inputs_for(&text);

    let default = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(note(&default, "CheckDistTag"), "Release 1.el9 lacks %{?dist}");

    let flagged = run_builtin(&inputs, &MockToolRunner::new(), &["DISTTAG=el9"]);
    assert_eq!(note(&flagged, "CheckDistTag"), "Release 1.el9 hard-codes the .el9 disttag");
}

#[test]
fn test_autochangelog_passes() {
    let text = LIB_SPEC.split("%changelog").next().unwrap().to_string() + "%changelog\n%autochangelog\n";
    let (_dir, inputs) = inputs_for(&text);
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckChangelog"), CheckState::Pass);
}

#[test]
fn test_devel_without_base_requirement_fails() {
    let text = LIB_SPEC.replace("Requires:       %{name}%{?_isa} = %{version}-%{release}\n", "");
    let (_dir, inputs) = inputs_for(&text);
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckFullVerReqSub"), CheckState::Fail);
    assert!(note(&results, "CheckFullVerReqSub").contains("- libfoo-devel"));
}

#[test]
fn test_unmarked_license_file_in_sources_fails() {
    let text = LIB_SPEC.replace("%license COPYING\n", "");
    let (dir, mut inputs) = inputs_for(&text);
    let unpacked = dir.path().join("srpm-unpacked");
    fs::create_dir_all(unpacked.join("foo-1.0")).unwrap();
    fs::write(unpacked.join("foo-1.0/LICENSE"), "MIT").unwrap();
    inputs.unpacked_dir = Some(unpacked);

    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckLicenseInDocs"), CheckState::Fail);
    assert!(note(&results, "CheckLicenseInDocs").contains("foo-1.0/LICENSE"));
}

// =============================================================================
// BUILD DEPENDENT CHECKS
// =============================================================================

#[test]
fn test_skipped_build_is_not_applicable() {
    let (_dir, inputs) = inputs_for(LIB_SPEC);
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckBuild"), CheckState::Na);
    assert_eq!(state(&results, "CheckInstall"), CheckState::Na);
    assert_eq!(state(&results, "CheckRpmlint"), CheckState::Na);
}

#[test]
fn test_failed_build_blocks_dependents() {
    let (_dir, mut inputs) = inputs_for(LIB_SPEC);
    inputs.build = BuildStatus::Failed("mock exited with status 30".into());

    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckBuild"), CheckState::Fail);
    assert_eq!(note(&results, "CheckBuild"), "mock exited with status 30");
    assert_eq!(state(&results, "CheckInstall"), CheckState::Pending);
    assert_eq!(note(&results, "CheckInstall"), "Not run: depends on CheckBuild (fail)");
}

#[test]
fn test_prebuilt_packages_pass_build_with_note() {
    let (_dir, mut inputs) = inputs_for(LIB_SPEC);
    inputs.packages = lib_packages();
    inputs.build = BuildStatus::Prebuilt;
    let results = run_builtin(&inputs, &clean_rpmlint(), &[]);
    assert_eq!(state(&results, "CheckBuild"), CheckState::Pass);
    assert_eq!(note(&results, "CheckBuild"), "Using prebuilt packages");
}

#[test]
fn test_missing_rpmlint_leaves_item_pending() {
    let (_dir, mut inputs) = inputs_for(LIB_SPEC);
    inputs.packages = lib_packages();
    inputs.build = BuildStatus::Built;
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckRpmlint"), CheckState::Pending);
    assert_eq!(note(&results, "CheckRpmlint"), "rpmlint is not installed");
}

#[test]
fn test_rpmlint_messages_are_attached() {
    let (_dir, mut inputs) = inputs_for(LIB_SPEC);
    inputs.packages = lib_packages();
    inputs.build = BuildStatus::Built;
    let tools = MockToolRunner::new().respond(
        "rpmlint",
        ToolOutput::with_code(
            66,
            "libfoo.x86_64: E: explicit-lib-dependency\n2 packages and 0 specfiles checked; 1 errors, 0 warnings.\n",
        ),
    );

    let results = run_builtin(&inputs, &tools, &[]);
    let rpmlint = results.get("CheckRpmlint").unwrap();
    assert_eq!(rpmlint.state(), CheckState::Pending);
    assert!(note(&results, "CheckRpmlint").contains("1 errors, 0 warnings"));
    assert_eq!(rpmlint.outcome.attachments.len(), 1);
    assert!(rpmlint.outcome.attachments[0].text.contains("explicit-lib-dependency"));
    assert!(tools.calls().iter().any(|c| c.contains("libfoo-devel-1.0-1.x86_64.rpm")));
}

#[test]
fn test_spec_differing_from_srpm_fails_with_diff() {
    let (dir, mut inputs) = inputs_for(LIB_SPEC);
    let unpacked = dir.path().join("srpm-unpacked");
    fs::create_dir_all(&unpacked).unwrap();
    fs::write(unpacked.join("libfoo.spec"), LIB_SPEC.replace("1.0", "1.1")).unwrap();
    inputs.unpacked_dir = Some(unpacked);
    inputs.srpm = Some(dir.path().join("libfoo-1.0-1.src.rpm"));

    let tools = MockToolRunner::new().respond("diff -U2", ToolOutput::with_code(1, "-Version: 1.0\n+Version: 1.1\n"));
    let results = run_builtin(&inputs, &tools, &[]);
    let check = results.get("CheckSpecInSrpm").unwrap();
    assert_eq!(check.state(), CheckState::Fail);
    assert_eq!(check.outcome.attachments[0].header, "Diff spec file in url and in SRPM");
}

#[test]
fn test_matching_srpm_spec_passes() {
    let (dir, mut inputs) = inputs_for(LIB_SPEC);
    let unpacked = dir.path().join("srpm-unpacked");
    fs::create_dir_all(&unpacked).unwrap();
    fs::write(unpacked.join("libfoo.spec"), LIB_SPEC).unwrap();
    inputs.unpacked_dir = Some(unpacked);
    inputs.srpm = Some(dir.path().join("libfoo-1.0-1.src.rpm"));

    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckSpecInSrpm"), CheckState::Pass);
}

//! Tests for the Python checks

use pkgreview::core::models::CheckState;
use pkgreview::core::services::ReviewResults;

use crate::common::{LIB_SPEC, MockToolRunner, inputs_for, package, run_builtin};

const PYPROJECT_SPEC: &str = "\
Name:           python-foo
Version:        1.2
Release:        1%{?dist}
Summary:        Foo for Python
License:        MIT
URL:            https://example.org/foo
Source0:        https://example.org/foo/foo-%{version}.tar.gz
BuildArch:      noarch
BuildRequires:  python3-devel

%description
Foo.

%package -n python3-foo
Summary:        %{summary}

%description -n python3-foo
Foo.

%prep
%autosetup -n foo-%{version}

%generate_buildrequires
%pyproject_buildrequires

%build
%pyproject_wheel

%install
%pyproject_install
%pyproject_save_files foo

%files -n python3-foo -f %{pyproject_files}
%license LICENSE

%changelog
* Mon Jan 01 2024 A Packager <packager@example.org> - 1.2-1
- Initial package
";

fn results_for(text: &str) -> ReviewResults {
    let (_dir, inputs) = inputs_for(text);
    run_builtin(&inputs, &MockToolRunner::new(), &[])
}

fn state(results: &ReviewResults, name: &str) -> CheckState {
    results.get(name).unwrap_or_else(|| panic!("{name} did not run")).state()
}

#[test]
fn test_modern_python_package_passes() {
    let results = results_for(PYPROJECT_SPEC);
    assert_eq!(state(&results, "CheckPythonBuildRequires"), CheckState::Pass);
    assert_eq!(state(&results, "CheckPythonDeprecatedMacros"), CheckState::Pass);
    assert_eq!(state(&results, "CheckPyprojectMacros"), CheckState::Pass);
}

#[test]
fn test_python_group_skipped_for_c_library() {
    let results = results_for(LIB_SPEC);
    assert!(results.get("CheckPythonBuildRequires").is_none());
    assert!(results.not_applicable.contains(&"CheckPyprojectMacros".to_string()));
}

#[test]
fn test_python_group_detected_from_files() {
    let text = LIB_SPEC.replace("Name:           libfoo", "Name:           foo");
    let (_dir, mut inputs) = inputs_for(&text);
    inputs.packages = vec![package("foo", &["/usr/lib/python3.13/site-packages/foo/__init__.py"])];
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    assert_eq!(state(&results, "CheckPythonBuildRequires"), CheckState::Fail);
}

#[test]
fn test_deprecated_macros_fail() {
    let text = PYPROJECT_SPEC
        .replace("%generate_buildrequires\n%pyproject_buildrequires\n\n", "")
        .replace("%pyproject_wheel", "%py3_build")
        .replace("%pyproject_install\n%pyproject_save_files foo", "%py3_install")
        .replace(" -f %{pyproject_files}", "");
    let results = results_for(&text);

    let deprecated = results.get("CheckPythonDeprecatedMacros").unwrap();
    assert_eq!(deprecated.state(), CheckState::Fail);
    let note = deprecated.outcome.note.as_deref().unwrap();
    assert!(note.contains("%py3_build"));
    assert!(note.contains("%py3_install"));
    assert!(results.not_applicable.contains(&"CheckPyprojectMacros".to_string()));
}

#[test]
fn test_partial_pyproject_usage_fails() {
    let text = PYPROJECT_SPEC.replace("%generate_buildrequires\n%pyproject_buildrequires\n\n", "");
    let results = results_for(&text);
    let check = results.get("CheckPyprojectMacros").unwrap();
    assert_eq!(check.state(), CheckState::Fail);
    assert_eq!(
        check.outcome.note.as_deref(),
        Some("Missing pyproject macros:\n- %pyproject_buildrequires in %generate_buildrequires")
    );
}

#[test]
fn test_missing_python3_devel_fails() {
    let text = PYPROJECT_SPEC.replace("BuildRequires:  python3-devel\n", "BuildRequires:  python3-setuptools\n");
    let (_dir, mut inputs) = inputs_for(&text);
    inputs.packages = vec![package("python3-foo", &["/usr/lib/python3.13/site-packages/foo/__init__.py"])];
    let results = run_builtin(&inputs, &MockToolRunner::new(), &[]);
    let check = results.get("CheckPythonBuildRequires").unwrap();
    assert_eq!(check.state(), CheckState::Fail);
    assert_eq!(check.outcome.note.as_deref(), Some("No BuildRequires: python3-devel"));
}

#[test]
fn test_python_build_tool_does_not_make_a_python_package() {
    let text = LIB_SPEC
        .replace("BuildRequires:  make\n", "BuildRequires:  make\nBuildRequires:  python3\n")
        .replace("Name:           libfoo", "Name:           python-ish");
    let results = results_for(&text);
    assert!(results.get("CheckPythonBuildRequires").is_none());
    assert!(results.not_applicable.contains(&"CheckPythonBuildRequires".to_string()));
}

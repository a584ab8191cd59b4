//! Python checks

use super::{RuleCheck, bullet_list, guideline};
use crate::core::models::{CheckInfo, CheckOutcome, CheckType};
use crate::core::ports::{Check, CheckContext, CheckError, Group};
use crate::specfile::SectionKind;

/// Group name
pub const GROUP: &str = "Python";

const DEPRECATED_MACROS: &[&str] = &[
    "%py3_build",
    "%{py3_build}",
    "%py3_install",
    "%{py3_install}",
    "%py_build",
    "%{py_build}",
    "%py_install",
    "%{py_install}",
    "setup.py install",
];

/// The Python group
#[must_use]
pub fn group() -> Group {
    Group::new(GROUP).applicable_when(is_python_package)
}

const PYTHON_DEVEL: &str = "python3-devel";

fn is_python_package(ctx: &CheckContext<'_>) -> bool {
    ctx.spec().build_requires_any(&[PYTHON_DEVEL])
        || ctx.all_files().any(|(_, f)| f.starts_with("/usr/lib/python3") || f.starts_with("/usr/lib64/python3"))
}

fn python_guideline(anchor: &str) -> String {
    guideline(&format!("Python/{anchor}"))
}

/// Python checks in registration order
#[must_use]
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        RuleCheck::new(
            CheckInfo::new(
                "CheckPythonBuildRequires",
                GROUP,
                CheckType::Must,
                "Python packages must have BuildRequires: python3-devel.",
            )
            .url(python_guideline("#_buildrequires")),
            check_build_requires,
        )
        .boxed(),
        RuleCheck::new(
            CheckInfo::new(
                "CheckPythonDeprecatedMacros",
                GROUP,
                CheckType::Should,
                "Package does not use the deprecated %py3_build and %py3_install macros.",
            )
            .url(python_guideline("#_deprecated_macros")),
            check_deprecated_macros,
        )
        .boxed(),
        RuleCheck::new(
            CheckInfo::new(
                "CheckPyprojectMacros",
                GROUP,
                CheckType::Should,
                "Package uses %pyproject_buildrequires with %pyproject_wheel and %pyproject_install.",
            )
            .url(python_guideline("#_pyproject_rpm_macros")),
            check_pyproject_macros,
        )
        .applicable_when(uses_pyproject_macros)
        .boxed(),
    ]
}

fn check_build_requires(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    Ok(CheckOutcome::pass_if(
        ctx.spec().build_requires_any(&[PYTHON_DEVEL]),
        "No BuildRequires: python3-devel",
    ))
}

fn check_deprecated_macros(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let uses: Vec<String> = ctx
        .spec()
        .code_lines()
        .filter_map(|(n, line)| {
            DEPRECATED_MACROS
                .iter()
                .find(|m| line.contains(*m))
                .map(|m| format!("line {n}: {m}"))
        })
        .collect();
    Ok(CheckOutcome::pass_if(
        uses.is_empty(),
        format!("Deprecated Python macros used:\n{}", bullet_list(&uses)),
    ))
}

fn uses_pyproject_macros(ctx: &CheckContext<'_>) -> bool {
    ctx.spec().code_lines().any(|(_, l)| l.contains("%pyproject_") || l.contains("%{pyproject_"))
}

fn check_pyproject_macros(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let spec = ctx.spec();
    let in_section = |kind: SectionKind, needle: &str| {
        spec.sections_of(&kind)
            .flat_map(|s| s.content_lines())
            .any(|l| l.contains(needle))
    };

    let mut missing = Vec::new();
    if !in_section(SectionKind::GenerateBuildrequires, "%pyproject_buildrequires") {
        missing.push("%pyproject_buildrequires in %generate_buildrequires");
    }
    if !in_section(SectionKind::Build, "%pyproject_wheel") {
        missing.push("%pyproject_wheel in %build");
    }
    if !in_section(SectionKind::Install, "%pyproject_install") {
        missing.push("%pyproject_install in %install");
    }
    Ok(CheckOutcome::pass_if(
        missing.is_empty(),
        format!("Missing pyproject macros:\n{}", bullet_list(&missing)),
    ))
}

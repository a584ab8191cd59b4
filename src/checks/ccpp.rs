//! C/C++ checks
//!
//! The group applies when the build ships libraries or headers, or the spec
//! pulls in a C/C++ compiler.

use super::{RuleCheck, bullet_list, guideline, in_lib_dir, is_shared_library, is_unversioned_so};
use super::generic::FLAG_EPEL7;
use crate::core::models::{CheckInfo, CheckOutcome, CheckType};
use crate::core::ports::{Check, CheckContext, CheckError, Group};
use crate::specfile::SectionKind;

/// Group name
pub const GROUP: &str = "C/C++";

const COMPILERS: &[&str] = &["gcc", "gcc-c++"];

/// The C/C++ group
#[must_use]
pub fn group() -> Group {
    Group::new(GROUP).applicable_when(ships_native_code)
}

fn ships_native_code(ctx: &CheckContext<'_>) -> bool {
    ctx.ships_suffix(&[".h", ".a", ".la"])
        || ctx.all_files().any(|(_, f)| is_shared_library(f))
        || ctx.spec().build_requires_any(COMPILERS)
}

fn info(name: &str, text: &str) -> CheckInfo {
    CheckInfo::new(name, GROUP, CheckType::Must, text)
}

/// C/C++ checks in registration order
#[must_use]
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        RuleCheck::new(
            info(
                "CheckLdconfig",
                "ldconfig not called in %post and %postun for Fedora 28 and later.",
            )
            .url(guideline("#_shared_libraries")),
            check_ldconfig,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckSoFiles",
                "Development (unversioned) .so files in -devel subpackage, if present.",
            )
            .needs(&["CheckBuild"])
            .deprecates(&["CheckDevelFilesInDevel"])
            .url(guideline("#_devel_packages")),
            check_so_files,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckHeaderFiles", "Header files in -devel subpackage, if present.")
                .needs(&["CheckBuild"])
                .deprecates(&["CheckDevelFilesInDevel"])
                .url(guideline("#_devel_packages")),
            check_header_files,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckStaticLibs",
                "Static libraries in -static or -devel subpackage, providing -devel if present.",
            )
            .needs(&["CheckBuild"])
            .url(guideline("#_packaging_static_libraries")),
            check_static_libs,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckLaFiles", "Package does not contain any libtool archives (.la)")
                .needs(&["CheckBuild"])
                .url(guideline("#_packaging_static_libraries")),
            check_la_files,
        )
        .boxed(),
    ]
}

/// Lines and scriptlets that run ldconfig
fn ldconfig_calls(ctx: &CheckContext<'_>) -> Vec<String> {
    let spec = ctx.spec();
    let mut calls: Vec<String> = spec
        .code_lines()
        .filter(|(_, l)| l.contains("%ldconfig_scriptlets") || l.contains("%{?ldconfig"))
        .map(|(n, l)| format!("line {n}: {}", l.trim()))
        .collect();
    for section in &spec.sections {
        let SectionKind::Scriptlet(name) = &section.kind else {
            continue;
        };
        let by_option = section.option("-p").is_some_and(|p| p.ends_with("ldconfig"));
        let in_body = section.content_lines().any(|l| l.contains("ldconfig"));
        if by_option || in_body {
            calls.push(format!("line {}: %{name}", section.line));
        }
    }
    calls
}

fn check_ldconfig(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let calls = ldconfig_calls(ctx);
    if !ctx.flag_set(FLAG_EPEL7) {
        return Ok(CheckOutcome::pass_if(
            calls.is_empty(),
            format!("ldconfig is called by:\n{}", bullet_list(&calls)),
        ));
    }

    let libraries = ctx
        .all_files()
        .any(|(_, f)| is_shared_library(f) && !is_unversioned_so(f) && in_lib_dir(f));
    if !libraries {
        return Ok(CheckOutcome::na());
    }
    Ok(CheckOutcome::pass_if(
        !calls.is_empty(),
        "Shared libraries are installed but ldconfig is not run in %post and %postun",
    ))
}

fn check_so_files(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let unversioned: Vec<_> = ctx.all_files().filter(|(_, f)| is_unversioned_so(f)).collect();
    if unversioned.is_empty() {
        return Ok(CheckOutcome::na());
    }
    let misplaced: Vec<String> = unversioned
        .into_iter()
        .filter(|(pkg, _)| !pkg.is_devel())
        .map(|(pkg, f)| format!("{}: {f}", pkg.name))
        .collect();
    Ok(CheckOutcome::pass_if(
        misplaced.is_empty(),
        format!("Unversioned .so files outside -devel:\n{}", bullet_list(&misplaced)),
    ))
}

fn check_header_files(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let headers: Vec<_> = ctx.all_files().filter(|(_, f)| f.ends_with(".h")).collect();
    if headers.is_empty() {
        return Ok(CheckOutcome::na());
    }
    let misplaced: Vec<String> = headers
        .into_iter()
        .filter(|(pkg, _)| !pkg.is_devel())
        .map(|(pkg, f)| format!("{}: {f}", pkg.name))
        .collect();
    Ok(CheckOutcome::pass_if(
        misplaced.is_empty(),
        format!("Header files outside -devel:\n{}", bullet_list(&misplaced)),
    ))
}

fn check_static_libs(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let archives: Vec<_> = ctx.all_files().filter(|(_, f)| f.ends_with(".a")).collect();
    if archives.is_empty() {
        return Ok(CheckOutcome::na());
    }
    let misplaced: Vec<String> = archives
        .iter()
        .filter(|(pkg, _)| !pkg.is_static() && !pkg.is_devel())
        .map(|(pkg, f)| format!("{}: {f}", pkg.name))
        .collect();
    if !misplaced.is_empty() {
        return Ok(CheckOutcome::fail(format!(
            "Static libraries outside -static or -devel:\n{}",
            bullet_list(&misplaced)
        )));
    }

    // A -static package has to pull in the -devel package it complements.
    let devel: Vec<&str> =
        ctx.packages().iter().filter(|p| p.is_devel()).map(|p| p.name.as_str()).collect();
    if devel.is_empty() {
        return Ok(CheckOutcome::pass());
    }
    let mut unlinked: Vec<&str> = archives
        .iter()
        .map(|(pkg, _)| *pkg)
        .filter(|pkg| pkg.is_static())
        .filter(|pkg| !pkg.requires.iter().any(|r| devel.contains(&r.as_str())))
        .map(|pkg| pkg.name.as_str())
        .collect();
    unlinked.dedup();
    Ok(CheckOutcome::pass_if(
        unlinked.is_empty(),
        format!("-static packages not requiring -devel:\n{}", bullet_list(&unlinked)),
    ))
}

fn check_la_files(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let archives: Vec<String> = ctx
        .packages()
        .iter()
        .flat_map(|pkg| pkg.files_with_suffix(".la").map(move |f| format!("{}: {f}", pkg.name)))
        .collect();
    Ok(CheckOutcome::pass_if(
        archives.is_empty(),
        format!("Libtool archives are shipped:\n{}", bullet_list(&archives)),
    ))
}

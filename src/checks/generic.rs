//! Generic checks - apply to every package

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use super::{RuleCheck, bullet_list, guideline, is_unversioned_so};
use crate::adapters::rpmlint::run_rpmlint;
use crate::adapters::unpack::find_spec;
use crate::core::models::{
    Attachment, BuildStatus, CheckInfo, CheckOutcome, CheckType, Flag, InstallStatus,
};
use crate::core::ports::{Check, CheckContext, CheckError, Group, ToolInvocation};
use crate::specfile::SectionKind;

/// Group name
pub const GROUP: &str = "Generic";

/// Flag: review for an EPEL7 target
pub const FLAG_EPEL7: &str = "EPEL7";

/// Flag: disttag of the target release
pub const FLAG_DISTTAG: &str = "DISTTAG";

#[allow(clippy::expect_used)]
static CHANGELOG_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\*\s+(Mon|Tue|Wed|Thu|Fri|Sat|Sun)\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}\s+\d{4}\s+\S",
    )
    .expect("valid changelog header pattern")
});

const LICENSE_FILE_PREFIXES: &[&str] = &["license", "licence", "copying"];

/// The Generic group and its flags
#[must_use]
pub fn group() -> Group {
    Group::new(GROUP)
        .with_flag(Flag::new(FLAG_EPEL7, "Review package for EPEL7 target", ""))
        .with_flag(Flag::new(FLAG_DISTTAG, "Default disttag e.g., \"fc41\"", "fc41"))
}

fn info(name: &str, kind: CheckType, text: &str) -> CheckInfo {
    CheckInfo::new(name, GROUP, kind, text)
}

/// Generic checks in registration order
#[must_use]
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        RuleCheck::new(
            info("CheckBuild", CheckType::Must, "Package successfully builds into binary rpms.")
                .url(guideline("#_architecture_support")),
            check_build,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckInstall", CheckType::Must, "Package installs properly.").needs(&["CheckBuild"]),
            check_install,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckRpmlint", CheckType::Must, "Rpmlint is run on all rpms the build produces.")
                .needs(&["CheckBuild"])
                .url(guideline("#_use_rpmlint")),
            check_rpmlint,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckSpecName",
                CheckType::Must,
                "Spec file name must match the spec package %{name}, in the format %{name}.spec.",
            )
            .url(guideline("#_spec_file_naming")),
            check_spec_name,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckLicenseField", CheckType::Must, "Package has a License tag.")
                .url(guideline("LicensingGuidelines/#_license_field")),
            check_license_field,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckLicenseInDocs",
                CheckType::Must,
                "License file installed when any subpackage combination is installed.",
            )
            .url(guideline("LicensingGuidelines/#_license_text")),
            check_license_in_docs,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckBuildroot", CheckType::Must, "Buildroot is not present.")
                .url(guideline("#_tags_and_sections")),
            check_buildroot,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckClean", CheckType::Should, "Package does not have a %clean section.")
                .url(guideline("#_tags_and_sections")),
            check_clean,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckDefattr", CheckType::Should, "%defattr is not used in %files.")
                .url(guideline("#_file_permissions")),
            check_defattr,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckMacros",
                CheckType::Must,
                "Package consistently uses macros (instead of hard-coded directory names).",
            )
            .url(guideline("#_macros")),
            check_macros,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckChangelog", CheckType::Must, "Changelog in prescribed format.")
                .url(guideline("#changelogs")),
            check_changelog,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckDistTag", CheckType::Should, "Dist tag is present.")
                .url(guideline("DistTag/")),
            check_dist_tag,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckSourceUrl", CheckType::Should, "SourceX tags are full URLs.")
                .url(guideline("SourceURL/")),
            check_source_url,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckFullVerReqSub",
                CheckType::Must,
                "Fully versioned dependency in subpackages if applicable.",
            )
            .url(guideline("#_requiring_base_package")),
            check_full_ver_req_sub,
        )
        .boxed(),
        RuleCheck::new(
            info(
                "CheckSpecInSrpm",
                CheckType::Must,
                "Spec file in the srpm matches the spec file being reviewed.",
            ),
            check_spec_in_srpm,
        )
        .applicable_when(|ctx| ctx.inputs.srpm.is_some())
        .boxed(),
        RuleCheck::new(
            info(
                "CheckDevelFilesInDevel",
                CheckType::Should,
                "Development files must be in a -devel package.",
            )
            .needs(&["CheckBuild"])
            .url(guideline("#_devel_packages")),
            check_devel_files_in_devel,
        )
        .boxed(),
        RuleCheck::new(
            info("CheckLicensecheck", CheckType::Extra, "Licensecheck output of the unpacked sources."),
            check_licensecheck,
        )
        .applicable_when(|ctx| ctx.unpacked_dir().is_some())
        .boxed(),
        RuleCheck::manual(
            info(
                "CheckNaming",
                CheckType::Must,
                "Package is named according to the Package Naming Guidelines.",
            )
            .url(guideline("Naming/")),
        )
        .boxed(),
        RuleCheck::manual(
            info(
                "CheckLicenseCorrect",
                CheckType::Must,
                "License field in the package spec file matches the actual license.",
            )
            .url(guideline("LicensingGuidelines/#_valid_license_short_names")),
        )
        .boxed(),
        RuleCheck::manual(
            info("CheckOwnDirs", CheckType::Must, "Package must own all directories that it creates.")
                .url(guideline("Directory_Ownership/")),
        )
        .boxed(),
        RuleCheck::manual(
            info(
                "CheckSourceMatchesUpstream",
                CheckType::Must,
                "Sources used to build the package match the upstream source, as provided in the spec URL.",
            )
            .url(guideline("SourceURL/")),
        )
        .boxed(),
    ]
}

fn check_build(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    Ok(match &ctx.inputs.build {
        BuildStatus::Built => CheckOutcome::pass(),
        BuildStatus::Prebuilt => CheckOutcome::pass().with_note("Using prebuilt packages"),
        BuildStatus::NotRun => CheckOutcome::na().with_note("Build was skipped"),
        BuildStatus::Failed(reason) => CheckOutcome::fail(reason.clone()),
    })
}

fn check_install(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    Ok(match &ctx.inputs.install {
        InstallStatus::Installed => CheckOutcome::pass(),
        InstallStatus::NotRun => CheckOutcome::na().with_note("Installation was skipped"),
        InstallStatus::Failed(reason) => CheckOutcome::fail(reason.clone()),
    })
}

fn check_rpmlint(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let mut paths: Vec<_> = ctx.inputs.srpm.iter().cloned().collect();
    paths.extend(ctx.packages().iter().map(|p| p.path.clone()));
    if paths.is_empty() {
        return Ok(CheckOutcome::na().with_note("No packages to lint"));
    }
    if !ctx.tools.is_available("rpmlint") {
        return Ok(CheckOutcome::pending().with_note("rpmlint is not installed"));
    }

    let report = run_rpmlint(ctx.tools, &paths)?;
    let outcome = if report.errors == 0 && report.warnings == 0 {
        CheckOutcome::pass().with_note("No rpmlint messages.")
    } else {
        CheckOutcome::pending().with_note(format!(
            "There are rpmlint messages (see attachment): {} errors, {} warnings.",
            report.errors, report.warnings
        ))
    };
    Ok(outcome.with_attachment(Attachment::new("Rpmlint", report.output, 10)))
}

fn check_spec_name(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let spec = ctx.spec();
    let expected = format!("{}.spec", spec.name());
    let actual = spec
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(CheckOutcome::pass_if(actual == expected, format!("Spec file is {actual}, expected {expected}")))
}

fn check_license_field(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let license = ctx.spec().tag("license").unwrap_or_default().trim();
    if license.is_empty() {
        return Ok(CheckOutcome::fail("No License tag in the main package"));
    }
    Ok(CheckOutcome::pass().with_note(format!("License: {license}")))
}

fn check_license_in_docs(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let spec = ctx.spec();
    let marked = spec
        .sections_of(&SectionKind::Files)
        .flat_map(|s| s.content_lines())
        .any(|l| l.starts_with("%license"));
    let shipped = ctx.all_files().any(|(_, f)| f.starts_with("/usr/share/licenses/"));
    if marked || shipped {
        return Ok(CheckOutcome::pass());
    }

    let candidates = ctx.unpacked_dir().map(find_license_files).unwrap_or_default();
    if candidates.is_empty() {
        Ok(CheckOutcome::pending()
            .with_note("No %license file found; verify that upstream ships no license text"))
    } else {
        Ok(CheckOutcome::fail(format!(
            "License files not marked with %license:\n{}",
            bullet_list(&candidates)
        )))
    }
}

fn find_license_files(dir: &Path) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            LICENSE_FILE_PREFIXES
                .iter()
                .any(|p| name.starts_with(p))
                .then(|| e.path().strip_prefix(dir).unwrap_or(e.path()).display().to_string())
        })
        .collect();
    found.sort();
    found
}

fn check_buildroot(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let tag = ctx.spec().main_package().tags.iter().find(|t| t.base_name() == "buildroot");
    Ok(match tag {
        Some(tag) => CheckOutcome::fail(format!("BuildRoot: tag on line {} is obsolete", tag.line)),
        None => CheckOutcome::pass(),
    })
}

fn check_clean(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    Ok(match ctx.spec().section(&SectionKind::Clean) {
        Some(section) => {
            CheckOutcome::fail(format!("%clean section on line {} is not needed", section.line))
        },
        None => CheckOutcome::pass(),
    })
}

fn check_defattr(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let uses: Vec<String> = ctx
        .spec()
        .sections_of(&SectionKind::Files)
        .filter(|s| s.content_lines().any(|l| l.starts_with("%defattr")))
        .map(|s| s.package.clone().unwrap_or_default())
        .collect();
    Ok(CheckOutcome::pass_if(
        uses.is_empty(),
        format!("%defattr(...) present in %files of:\n{}", bullet_list(&uses)),
    ))
}

fn check_macros(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let (mut braces, mut env) = (0_usize, 0_usize);
    for (_, line) in ctx.spec().code_lines() {
        braces += line.matches("%{buildroot}").count() + line.matches("%buildroot").count();
        env += line.matches("$RPM_BUILD_ROOT").count() + line.matches("${RPM_BUILD_ROOT}").count();
    }
    Ok(CheckOutcome::pass_if(
        braces == 0 || env == 0,
        format!("%{{buildroot}} used {braces} times and $RPM_BUILD_ROOT used {env} times"),
    ))
}

fn check_changelog(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let Some(section) = ctx.spec().section(&SectionKind::Changelog) else {
        return Ok(CheckOutcome::fail("No %changelog section"));
    };
    if section.content_lines().any(|l| l.contains("%autochangelog")) {
        return Ok(CheckOutcome::pass().with_note("Changelog generated by %autochangelog"));
    }

    let headers: Vec<&str> = section.content_lines().filter(|l| l.starts_with('*')).collect();
    if headers.is_empty() {
        return Ok(CheckOutcome::fail("%changelog has no entries"));
    }
    let malformed: Vec<&str> =
        headers.into_iter().filter(|h| !CHANGELOG_HEADER.is_match(h)).collect();
    Ok(CheckOutcome::pass_if(
        malformed.is_empty(),
        format!("Malformed changelog entries:\n{}", bullet_list(&malformed)),
    ))
}

fn check_dist_tag(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let release = ctx.spec().release();
    if ["%{?dist}", "%{dist}", "%dist", "%autorelease", "%{autorelease}"]
        .iter()
        .any(|m| release.contains(m))
    {
        return Ok(CheckOutcome::pass());
    }

    let disttag = ctx.flags.value(FLAG_DISTTAG).unwrap_or_default();
    if !disttag.is_empty() && release.contains(&format!(".{disttag}")) {
        return Ok(CheckOutcome::fail(format!("Release {release} hard-codes the .{disttag} disttag")));
    }
    Ok(CheckOutcome::fail(format!("Release {release} lacks %{{?dist}}")))
}

fn check_source_url(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let spec = ctx.spec();
    let sources = spec.sources();
    if sources.is_empty() {
        return Ok(CheckOutcome::na());
    }
    let local: Vec<String> = sources
        .iter()
        .filter(|t| !t.value.contains("://"))
        .map(|t| format!("{}: {}", t.name, spec.expand(&t.value)))
        .collect();
    Ok(CheckOutcome::pass_if(
        local.is_empty(),
        format!("Sources without a URL:\n{}", bullet_list(&local)),
    ))
}

fn check_full_ver_req_sub(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let spec = ctx.spec();
    let main = spec.name();
    let devel: Vec<_> = spec.packages.iter().skip(1).filter(|p| p.name.ends_with("-devel")).collect();
    if devel.is_empty() {
        return Ok(CheckOutcome::na());
    }

    let missing: Vec<&str> = devel
        .iter()
        .filter(|pkg| !pkg.tags("requires").any(|value| is_full_base_requirement(value, main)))
        .map(|pkg| pkg.name.as_str())
        .collect();
    Ok(CheckOutcome::pass_if(
        missing.is_empty(),
        format!(
            "No Requires: %{{name}}%{{?_isa}} = %{{version}}-%{{release}} in:\n{}",
            bullet_list(&missing)
        ),
    ))
}

/// Whether a `Requires` value pins the base package to the exact build
fn is_full_base_requirement(value: &str, main: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let names_base = compact.starts_with("%{name}") || compact.starts_with(main);
    let exact = compact.contains("=%{version}-%{release}") || compact.contains("=%{evr}");
    names_base && exact
}

fn check_spec_in_srpm(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let dir = ctx
        .unpacked_dir()
        .ok_or_else(|| CheckError::MissingInput("unpacked source rpm".into()))?;
    let srpm_spec = find_spec(dir).map_err(|e| CheckError::MissingInput(e.to_string()))?;
    let reviewed = &ctx.spec().path;

    if fs::read_to_string(&srpm_spec)? == fs::read_to_string(reviewed)? {
        return Ok(CheckOutcome::pass());
    }

    let mut outcome = CheckOutcome::fail("Spec file in srpm differs from the reviewed spec (see attachment)");
    if ctx.tools.is_available("diff") {
        let diff = ctx.tools.run(
            &ToolInvocation::new("diff").arg("-U2").path_arg(reviewed).path_arg(&srpm_spec),
        )?;
        outcome = outcome.with_attachment(Attachment::new(
            "Diff spec file in url and in SRPM",
            diff.stdout,
            20,
        ));
    }
    Ok(outcome)
}

fn check_devel_files_in_devel(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    if ctx.packages().is_empty() {
        return Ok(CheckOutcome::na());
    }
    let misplaced: Vec<String> = ctx
        .all_files()
        .filter(|(pkg, _)| !pkg.is_devel())
        .filter(|(_, f)| f.ends_with(".h") || is_unversioned_so(f))
        .map(|(pkg, f)| format!("{}: {f}", pkg.name))
        .collect();
    Ok(CheckOutcome::pass_if(
        misplaced.is_empty(),
        format!("Development files outside -devel:\n{}", bullet_list(&misplaced)),
    ))
}

fn check_licensecheck(ctx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
    let dir = ctx
        .unpacked_dir()
        .ok_or_else(|| CheckError::MissingInput("unpacked source rpm".into()))?;
    if !ctx.tools.is_available("licensecheck") {
        return Ok(CheckOutcome::pending().with_note("licensecheck is not installed"));
    }
    let output = ctx
        .tools
        .run_checked(&ToolInvocation::new("licensecheck").arg("-r").path_arg(dir))?;
    Ok(CheckOutcome::pending()
        .with_note("Review the licensecheck output (see attachment)")
        .with_attachment(Attachment::new("Licensecheck", output.stdout, 30)))
}

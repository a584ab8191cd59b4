//! Line-oriented spec parser

use std::collections::BTreeMap;
use std::path::Path;

use super::{Package, Section, SectionKind, SpecFile, SpecParseError, Tag};

const MAX_EXPANSION_PASSES: usize = 8;

const VERSION_OPERATORS: &[&str] = &["<", ">", "=", "<=", ">=", "==", "<>"];
const RICH_KEYWORDS: &[&str] = &["or", "and", "if", "else", "with", "without", "unless"];

enum Cursor {
    /// Collecting tags for the main package (`None`) or sub-package `Some(i)`
    Preamble(Option<usize>),
    /// Collecting body lines for section `i`
    Body(usize),
}

struct RawSubPackage {
    args: String,
    tags: Vec<Tag>,
}

pub(super) fn parse(path: &Path, text: &str) -> Result<SpecFile, SpecParseError> {
    let mut macros = BTreeMap::new();
    let mut main_tags = Vec::new();
    let mut subs: Vec<RawSubPackage> = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut cursor = Cursor::Preamble(None);

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();

        if let Some(directive) = trimmed.strip_prefix('%') {
            let (word, rest) = split_word(directive);

            if word == "global" || word == "define" {
                let (key, value) = split_word(rest);
                if !key.is_empty() {
                    macros.insert(key.to_string(), value.to_string());
                }
                if let Cursor::Body(i) = cursor {
                    sections[i].lines.push(raw.to_string());
                }
                continue;
            }

            if let Some(kind) = SectionKind::from_directive(word) {
                if kind == SectionKind::Package {
                    subs.push(RawSubPackage {
                        args: rest.to_string(),
                        tags: Vec::new(),
                    });
                    cursor = Cursor::Preamble(Some(subs.len() - 1));
                } else {
                    cursor = Cursor::Body(sections.len());
                }
                sections.push(Section {
                    kind,
                    package: None,
                    args: rest.to_string(),
                    lines: Vec::new(),
                    line: line_no,
                });
                continue;
            }
        }

        match cursor {
            Cursor::Preamble(target) => {
                if let Some(tag) = parse_tag(raw, line_no) {
                    match target {
                        Some(i) => subs[i].tags.push(tag),
                        None => main_tags.push(tag),
                    }
                }
            },
            Cursor::Body(i) => sections[i].lines.push(raw.to_string()),
        }
    }

    let raw_name = main_tags
        .iter()
        .find(|t| t.base_name() == "name")
        .map(|t| t.value.clone())
        .ok_or_else(|| SpecParseError::MissingName(path.to_path_buf()))?;
    let main_name = expand_simple(&raw_name, &macros);

    let mut known = macros.clone();
    known.insert("name".into(), main_name.clone());
    for tag in &main_tags {
        let base = tag.base_name();
        if matches!(base.as_str(), "version" | "release" | "epoch") {
            known.entry(base).or_insert_with(|| tag.value.clone());
        }
    }

    for section in &mut sections {
        if section.kind.is_package_scoped() {
            section.package = Some(resolve_package(&section.args, &main_name, &known));
        }
    }

    let mut packages = vec![Package {
        name: main_name.clone(),
        tags: main_tags,
    }];
    packages.extend(subs.into_iter().map(|sub| Package {
        name: resolve_package(&sub.args, &main_name, &known),
        tags: sub.tags,
    }));

    Ok(SpecFile {
        path: path.to_path_buf(),
        packages,
        sections,
        macros,
        text: text.to_string(),
    })
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim()),
        None => (s, ""),
    }
}

fn parse_tag(raw: &str, line: usize) -> Option<Tag> {
    let (name, value) = raw.split_once(':')?;
    let mut chars = name.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '(' | ')' | '_' | '-' | ',')) {
        return None;
    }
    Some(Tag {
        name: name.to_string(),
        value: value.trim().to_string(),
        line,
    })
}

/// Full package name for `%package`/`%files`/`%description` style arguments
fn resolve_package(args: &str, main: &str, macros: &BTreeMap<String, String>) -> String {
    let mut tokens = args.split_whitespace();
    while let Some(tok) = tokens.next() {
        match tok {
            "-n" => {
                if let Some(name) = tokens.next() {
                    return expand_simple(name, macros);
                }
            },
            "-f" | "-p" | "-e" => {
                tokens.next();
            },
            t if t.starts_with('-') => {},
            suffix => return format!("{main}-{}", expand_simple(suffix, macros)),
        }
    }
    main.to_string()
}

/// Substitute known macros until the text stops changing
pub(super) fn expand_simple(input: &str, macros: &BTreeMap<String, String>) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_EXPANSION_PASSES {
        let next = expand_once(&current, macros);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn expand_once(input: &str, macros: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let inner = &braced[..end];
                let key = inner.strip_prefix('?').unwrap_or(inner);
                if let Some(value) = macros.get(key) {
                    out.push_str(value);
                    rest = &braced[end + 1..];
                    continue;
                }
            }
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if let Some(value) = macros.get(&after[..len]) {
                out.push_str(value);
                rest = &after[len..];
                continue;
            }
        }

        out.push('%');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Resolve `%{?macro}`, `%{?macro:text}` and `%{!?macro:text}`
///
/// Undefined macros expand to nothing, as rpm does for the `?` forms.
pub(super) fn resolve_conditionals(input: &str, macros: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("%{") {
        out.push_str(&rest[..pos]);
        let body = &rest[pos + 2..];
        let (negated, cond) = if let Some(cond) = body.strip_prefix("!?") {
            (true, cond)
        } else if let Some(cond) = body.strip_prefix('?') {
            (false, cond)
        } else {
            out.push_str("%{");
            rest = body;
            continue;
        };
        let Some(end) = closing_brace(cond) else {
            out.push_str(&rest[pos..]);
            return out;
        };

        let inner = &cond[..end];
        let (name, text) = match inner.split_once(':') {
            Some((name, text)) => (name, Some(text)),
            None => (inner, None),
        };
        let value = macros.get(name);
        match text {
            Some(text) if value.is_some() != negated => out.push_str(&resolve_conditionals(text, macros)),
            None if !negated => out.push_str(value.map_or("", String::as_str)),
            _ => {},
        }
        rest = &cond[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Index of the `}` closing a brace opened just before `s`
fn closing_brace(s: &str) -> Option<usize> {
    let mut depth = 1;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            },
            _ => {},
        }
    }
    None
}

/// Package names mentioned in a requirement tag value
///
/// Versions and comparison operators are dropped, as are the keywords of
/// rich dependencies: `foo >= 1.0, (bar or baz)` gives `foo`, `bar`, `baz`.
#[must_use]
pub fn parse_requirement_names(value: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut skip_version = false;

    for tok in value.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
        if skip_version {
            skip_version = false;
            continue;
        }
        if VERSION_OPERATORS.contains(&tok) {
            skip_version = true;
            continue;
        }
        if RICH_KEYWORDS.contains(&tok) {
            continue;
        }

        let mut name = tok.trim_start_matches('(');
        while name.ends_with(')') && name.matches(')').count() > name.matches('(').count() {
            name = &name[..name.len() - 1];
        }
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }

    names
}

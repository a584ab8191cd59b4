//! Spec file sections

use serde::Serialize;

/// Kind of a `%section` in a spec file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// `%description`
    Description,
    /// `%package` (sub-package preamble)
    Package,
    /// `%prep`
    Prep,
    /// `%conf`
    Conf,
    /// `%build`
    Build,
    /// `%install`
    Install,
    /// `%check`
    Check,
    /// `%clean`
    Clean,
    /// `%files`
    Files,
    /// `%changelog`
    Changelog,
    /// `%generate_buildrequires`
    GenerateBuildrequires,
    /// Install/erase scriptlets (`%pre`, `%post`, `%preun`, `%postun`,
    /// `%pretrans`, `%posttrans`)
    Scriptlet(String),
}

const SCRIPTLETS: &[&str] = &["pre", "post", "preun", "postun", "pretrans", "posttrans"];

impl SectionKind {
    /// Map a directive name (without `%`) to a section kind
    #[must_use]
    pub fn from_directive(name: &str) -> Option<Self> {
        let kind = match name {
            "description" => Self::Description,
            "package" => Self::Package,
            "prep" => Self::Prep,
            "conf" => Self::Conf,
            "build" => Self::Build,
            "install" => Self::Install,
            "check" => Self::Check,
            "clean" => Self::Clean,
            "files" => Self::Files,
            "changelog" => Self::Changelog,
            "generate_buildrequires" => Self::GenerateBuildrequires,
            s if SCRIPTLETS.contains(&s) => Self::Scriptlet(s.to_string()),
            _ => return None,
        };
        Some(kind)
    }

    /// Whether the section belongs to a specific (sub-)package
    #[must_use]
    pub const fn is_package_scoped(&self) -> bool {
        matches!(self, Self::Description | Self::Package | Self::Files | Self::Scriptlet(_))
    }

    /// Section directive as written in a spec file
    #[must_use]
    pub fn directive(&self) -> String {
        match self {
            Self::Description => "%description".into(),
            Self::Package => "%package".into(),
            Self::Prep => "%prep".into(),
            Self::Conf => "%conf".into(),
            Self::Build => "%build".into(),
            Self::Install => "%install".into(),
            Self::Check => "%check".into(),
            Self::Clean => "%clean".into(),
            Self::Files => "%files".into(),
            Self::Changelog => "%changelog".into(),
            Self::GenerateBuildrequires => "%generate_buildrequires".into(),
            Self::Scriptlet(name) => format!("%{name}"),
        }
    }
}

/// A parsed section with its body
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Section kind
    pub kind: SectionKind,
    /// Full name of the package this section belongs to (package-scoped kinds)
    pub package: Option<String>,
    /// Raw arguments following the directive
    pub args: String,
    /// Body lines (header excluded)
    pub lines: Vec<String>,
    /// 1-based line number of the header
    pub line: usize,
}

impl Section {
    /// Body joined with newlines
    #[must_use]
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// Value of an option in the header arguments (e.g. `-p` in `%post -p /sbin/ldconfig`)
    #[must_use]
    pub fn option(&self, opt: &str) -> Option<&str> {
        let mut tokens = self.args.split_whitespace();
        while let Some(tok) = tokens.next() {
            if tok == opt {
                return tokens.next();
            }
        }
        None
    }

    /// Body lines that are not blank and not comments
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
    }
}

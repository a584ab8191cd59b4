//! CLI definitions and entry point

use std::path::PathBuf;

use clap::Parser;

use super::commands;
use pkgreview::core::services::Selection;
use pkgreview::output::OutputMode;
use pkgreview::session::{BuildMode, ReviewSettings};
use pkgreview::source::SourceRequest;

/// pkgreview - Packaging-guideline review assistant
#[derive(Parser, Debug)]
#[command(
    name = "pkgreview",
    version,
    about = "Packaging-guideline review assistant for RPM packages",
    long_about = "Run packaging-guideline checks against a spec file, its source rpm\n\
                  and the packages it builds.\n\n\
                  The result is a review template (review.txt) in the work directory:\n\
                  automatic checks are filled in, manual items are left for the reviewer."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long)]
    pub json: bool,

    /// Review NAME.spec and the newest NAME-*.src.rpm in the current directory
    #[arg(short, long, value_name = "NAME", conflicts_with_all = ["spec", "srpm"])]
    pub name: Option<String>,

    /// Spec file to review
    #[arg(long, value_name = "PATH")]
    pub spec: Option<PathBuf>,

    /// Source rpm to review
    #[arg(long, value_name = "PATH")]
    pub srpm: Option<PathBuf>,

    /// Review the spec file contained in the source rpm
    #[arg(short = 'r', long)]
    pub rpm_spec: bool,

    /// Mock configuration (mock -r)
    #[arg(short, long, value_name = "CONFIG")]
    pub mock_config: Option<String>,

    /// Extra options passed to mock
    #[arg(short = 'o', long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub mock_options: Option<String>,

    /// Do not build the package
    #[arg(long, conflicts_with = "prebuilt")]
    pub no_build: bool,

    /// Do not install the built packages
    #[arg(long)]
    pub no_install: bool,

    /// Use prebuilt rpms from DIR (default: current directory)
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    pub prebuilt: Option<Option<PathBuf>>,

    /// Run only this check (repeatable)
    #[arg(short, long, value_name = "CHECK")]
    pub single: Vec<String>,

    /// Exclude checks (comma-separated)
    #[arg(short = 'x', long, value_name = "CHECK,...", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Set a flag (repeatable)
    #[arg(short = 'D', long = "define", value_name = "FLAG[=VALUE]")]
    pub define: Vec<String>,

    /// Load script checks from DIR (repeatable)
    #[arg(long, value_name = "DIR")]
    pub plugin_dir: Vec<PathBuf>,

    /// Work directory (default: ./<name>-review)
    #[arg(short, long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// List available checks and exit
    #[arg(short, long)]
    pub list_checks: bool,

    /// List available flags and exit
    #[arg(short = 'f', long)]
    pub display_flags: bool,

    /// Write a starter config file and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    /// Review settings from the command line, before config defaults
    #[must_use]
    pub fn settings(&self) -> ReviewSettings {
        let build = match (&self.prebuilt, self.no_build) {
            (Some(dir), _) => BuildMode::Prebuilt(dir.clone()),
            (None, true) => BuildMode::Skip,
            (None, false) => BuildMode::Mock,
        };
        let exclude = self
            .exclude
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        ReviewSettings {
            source: SourceRequest {
                name: self.name.clone(),
                spec: self.spec.clone(),
                srpm: self.srpm.clone(),
                rpm_spec: self.rpm_spec,
            },
            workdir: self.workdir.clone(),
            workdir_parent: None,
            mock_config: self.mock_config.clone(),
            mock_options: pkgreview::config::split_options(self.mock_options.as_deref()),
            build,
            install: !self.no_install,
            selection: Selection {
                only: self.single.clone(),
                exclude,
            },
            flags: self.define.clone(),
            plugin_dirs: self.plugin_dir.clone(),
        }
    }
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if cli.init_config {
        return commands::init_config(output_mode);
    }
    if cli.list_checks {
        return commands::list_checks(&cli.plugin_dir, output_mode);
    }
    if cli.display_flags {
        return commands::display_flags(&cli.plugin_dir, output_mode);
    }
    commands::review(cli.settings(), output_mode)
}

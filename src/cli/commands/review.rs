//! Run a review

use std::env;

use anyhow::Context;

use pkgreview::adapters::SystemToolRunner;
use pkgreview::config::GlobalConfig;
use pkgreview::output::{OutputMode, ReviewResult};
use pkgreview::session::{ReviewSettings, run_review};

/// Review the package described by `settings`
pub fn review(settings: ReviewSettings, mode: OutputMode) -> anyhow::Result<()> {
    let settings = settings.with_config(&GlobalConfig::load());
    let cwd = env::current_dir().context("cannot determine the current directory")?;

    let outcome = run_review(&settings, &SystemToolRunner::new(), &cwd).context("review failed")?;

    ReviewResult {
        report_path: outcome.report_path.display().to_string(),
        report: outcome.report,
    }
    .render(mode);
    Ok(())
}

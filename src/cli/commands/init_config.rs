//! Write a starter config file

use anyhow::Context;

use pkgreview::config::GlobalConfig;
use pkgreview::output::{OperationResult, OutputMode};

/// Write `~/.pkgreview/config.toml` unless it already exists
pub fn init_config(mode: OutputMode) -> anyhow::Result<()> {
    let path = GlobalConfig::config_path();
    if path.exists() {
        OperationResult {
            success: false,
            message: format!("Config already exists at {}", path.display()),
        }
        .render(mode);
        return Ok(());
    }

    let path = GlobalConfig::starter().save().context("cannot write config")?;
    OperationResult {
        success: true,
        message: format!("Created {}", path.display()),
    }
    .render(mode);
    Ok(())
}

//! Tests for the global config file
//!
//! These tests point `HOME` at a temp directory, so they run serially.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use pkgreview::config::GlobalConfig;
use pkgreview::paths;
use pkgreview::session::ReviewSettings;

/// Temporary `HOME`, restored on drop
struct HomeGuard {
    temp: TempDir,
    previous: Option<std::ffi::OsString>,
}

impl HomeGuard {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let previous = env::var_os("HOME");
        // SAFETY: tests touching HOME are serialized with #[serial(home)]
        unsafe { env::set_var("HOME", temp.path()) };
        Self { temp, previous }
    }

    fn home(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }
}

impl Drop for HomeGuard {
    fn drop(&mut self) {
        // SAFETY: see HomeGuard::new
        unsafe {
            match &self.previous {
                Some(home) => env::set_var("HOME", home),
                None => env::remove_var("HOME"),
            }
        }
    }
}

#[test]
#[serial(home)]
fn test_config_lives_under_home() {
    let guard = HomeGuard::new();
    assert_eq!(paths::global_config(), guard.home().join(".pkgreview/config.toml"));
}

#[test]
#[serial(home)]
fn test_missing_config_loads_defaults() {
    let _guard = HomeGuard::new();
    assert_eq!(GlobalConfig::load(), GlobalConfig::default());
}

#[test]
#[serial(home)]
fn test_saved_config_loads_back() {
    let _guard = HomeGuard::new();
    let mut config = GlobalConfig::starter();
    config.exclude.push("CheckRpmlint".into());
    config.flags.insert("DISTTAG".into(), "fc40".into());

    let path = config.save().unwrap();
    assert!(path.is_file());
    assert_eq!(GlobalConfig::load(), config);
}

#[test]
#[serial(home)]
fn test_invalid_config_falls_back_to_defaults() {
    let _guard = HomeGuard::new();
    fs::create_dir_all(paths::global_config_dir()).unwrap();
    fs::write(paths::global_config(), "mock_config = [not toml").unwrap();
    assert_eq!(GlobalConfig::load(), GlobalConfig::default());
}

#[test]
#[serial(home)]
fn test_loaded_config_feeds_review_settings() {
    let _guard = HomeGuard::new();
    fs::create_dir_all(paths::global_config_dir()).unwrap();
    fs::write(
        paths::global_config(),
        "mock_config = \"epel-9-x86_64\"\nmock_options = \"--no-clean\"\nplugin_dirs = [\"/srv/checks\"]\n",
    )
    .unwrap();

    let settings = ReviewSettings {
        plugin_dirs: vec![PathBuf::from("/opt/checks")],
        ..ReviewSettings::default()
    }
    .with_config(&GlobalConfig::load());

    assert_eq!(settings.mock_config.as_deref(), Some("epel-9-x86_64"));
    assert_eq!(settings.mock_options, vec!["--no-clean"]);
    assert_eq!(settings.plugin_dirs, vec![PathBuf::from("/srv/checks"), PathBuf::from("/opt/checks")]);
}

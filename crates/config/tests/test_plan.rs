//! Test plan for the `marketplace-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use marketplace_config::{load, AppConfig, HttpConfig, SeedConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "MARKETPLACE_CONFIG",
    "MARKETPLACE__DATABASE__MAX_CONNECTIONS",
    "MARKETPLACE__DATABASE__URL",
    "MARKETPLACE__HTTP__ADDRESS",
    "MARKETPLACE__HTTP__PORT",
    "MARKETPLACE__SEED__ENABLED",
    "MARKETPLACE__SEED__COLLEGE_NAME",
    "MARKETPLACE__SEED__COLLEGE_DOMAIN",
    "MARKETPLACE__SEED__SELLER_NAME",
    "MARKETPLACE__SEED__SELLER_EMAIL",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.seed.enabled, defaults.seed.enabled);
    assert_eq!(config.seed.college_domain, defaults.seed.college_domain);
    assert_eq!(config.seed.seller_email, defaults.seed.seller_email);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "marketplace.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/marketplace.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "marketplace.toml",
        r#"
        [database]
        max_connections = 50

        [seed]
        college_name = "State College"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.database.max_connections, 50);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.seed.college_name, "State College");
    assert_eq!(config.seed.college_domain, defaults.seed.college_domain);
}

#[test]
#[serial]
fn load_honours_explicit_config_path() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [http]
        address = "0.0.0.0"
        "#,
    );
    ctx.set_var(
        "MARKETPLACE_CONFIG",
        temp_dir.path().join("elsewhere/custom.toml").display().to_string(),
    );

    let config = load().expect("configuration load should read the explicit path");
    assert_eq!(config.http.address, "0.0.0.0");
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "marketplace.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("MARKETPLACE__HTTP__PORT", "9090");
    ctx.set_var("MARKETPLACE__SEED__ENABLED", "false");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 9090);
    assert!(!config.seed.enabled);
}

#[test]
#[serial]
fn load_supports_database_url_environment_variable() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let url = "sqlite:///var/lib/marketplace/marketplace.db";
    ctx.set_var("MARKETPLACE__DATABASE__URL", url);

    let config = load().expect("configuration load should read database env override");
    assert_eq!(config.database.url, url);
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "marketplace.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn seed_config_defaults_describe_default_college() {
    let defaults = SeedConfig::default();
    assert!(defaults.enabled);
    assert_eq!(defaults.college_name, "Default University");
    assert_eq!(defaults.college_domain, "default.edu");
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 8080);
}

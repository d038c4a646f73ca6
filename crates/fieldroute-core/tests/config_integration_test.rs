//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use fieldroute_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use fieldroute_core::models::CheckInPolicy;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [
    "FIELDROUTE_HIGH_ACCURACY",
    "FIELDROUTE_LOCATION_TIMEOUT_MS",
    "FIELDROUTE_MAX_CACHE_AGE_MS",
    "FIELDROUTE_CHECK_IN_POLICY",
    "FIELDROUTE_DATA_DIR",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file(
        r#"
location_timeout_ms = 4000
# Only override the timeout, leave others as defaults
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.location_timeout_ms.value, 4000);
    assert_eq!(config.location_timeout_ms.source, ConfigSource::File);
    assert!(config.high_accuracy.value);
    assert_eq!(config.high_accuracy.source, ConfigSource::Default);
    assert_eq!(config.check_in_policy.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/fieldroute.toml");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("FIELDROUTE_LOCATION_TIMEOUT_MS", "2000");
    env::set_var("FIELDROUTE_CHECK_IN_POLICY", "replace");
    env::set_var("FIELDROUTE_DATA_DIR", "/tmp/fieldroute-env");

    let file = config_file(
        r#"
location_timeout_ms = 8000
check_in_policy = "reject"
data_dir = "/srv/fieldroute"
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.location_timeout_ms.value, 2000);
    assert_eq!(config.location_timeout_ms.source, ConfigSource::Environment);
    assert_eq!(config.check_in_policy.value, CheckInPolicy::Replace);
    assert_eq!(config.data_dir.value, PathBuf::from("/tmp/fieldroute-env"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("FIELDROUTE_HIGH_ACCURACY", "maybe");
    env::set_var("FIELDROUTE_LOCATION_TIMEOUT_MS", "0");
    env::set_var("FIELDROUTE_CHECK_IN_POLICY", "merge");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert!(config.high_accuracy.value);
    assert_eq!(config.high_accuracy.source, ConfigSource::Default);
    assert_eq!(config.location_timeout_ms.value, 10_000);
    assert_eq!(config.check_in_policy.value, CheckInPolicy::Reject);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    env::set_var("FIELDROUTE_MAX_CACHE_AGE_MS", "15000");

    let file = config_file("max_cache_age_ms = 5000");

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        max_cache_age_ms: Some(0),
        ..Default::default()
    });

    assert_eq!(config.max_cache_age_ms.value, 0);
    assert_eq!(config.max_cache_age_ms.source, ConfigSource::Cli);
    assert_eq!(config.geolocation_options().max_cache_age_ms, 0);

    clear_env();
}

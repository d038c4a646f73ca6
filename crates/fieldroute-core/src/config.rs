use crate::error::{FieldrouteError, Result};
use crate::models::{CheckInPolicy, GeolocationOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Fieldroute
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub high_accuracy: ConfigValue<bool>,
    pub location_timeout_ms: ConfigValue<u64>,
    pub max_cache_age_ms: ConfigValue<u64>,
    pub check_in_policy: ConfigValue<CheckInPolicy>,
    pub data_dir: ConfigValue<PathBuf>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let options = GeolocationOptions::default();
        Self {
            high_accuracy: ConfigValue::new(options.enable_high_accuracy, ConfigSource::Default),
            location_timeout_ms: ConfigValue::new(options.timeout_ms, ConfigSource::Default),
            max_cache_age_ms: ConfigValue::new(options.max_cache_age_ms, ConfigSource::Default),
            check_in_policy: ConfigValue::new(CheckInPolicy::default(), ConfigSource::Default),
            data_dir: ConfigValue::new(PathBuf::from(".fieldroute"), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FieldrouteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FieldrouteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(high_accuracy) = file_config.high_accuracy {
            self.high_accuracy.update(high_accuracy, ConfigSource::File);
        }

        if let Some(timeout) = file_config.location_timeout_ms {
            self.location_timeout_ms.update(timeout, ConfigSource::File);
        }

        if let Some(max_age) = file_config.max_cache_age_ms {
            self.max_cache_age_ms.update(max_age, ConfigSource::File);
        }

        if let Some(policy) = file_config.check_in_policy {
            self.check_in_policy.update(policy, ConfigSource::File);
        }

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FIELDROUTE_HIGH_ACCURACY
        if let Ok(raw) = env::var("FIELDROUTE_HIGH_ACCURACY") {
            match parse_bool(&raw) {
                Ok(value) => self.high_accuracy.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDROUTE_HIGH_ACCURACY value '{}': expected true or false",
                    raw
                ),
            }
        }

        // FIELDROUTE_LOCATION_TIMEOUT_MS
        if let Ok(raw) = env::var("FIELDROUTE_LOCATION_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(value) if value > 0 => {
                    self.location_timeout_ms.update(value, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid FIELDROUTE_LOCATION_TIMEOUT_MS value '{}': expected positive integer",
                    raw
                ),
            }
        }

        // FIELDROUTE_MAX_CACHE_AGE_MS
        if let Ok(raw) = env::var("FIELDROUTE_MAX_CACHE_AGE_MS") {
            match raw.parse::<u64>() {
                Ok(value) => self.max_cache_age_ms.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDROUTE_MAX_CACHE_AGE_MS value '{}': expected integer",
                    raw
                ),
            }
        }

        // FIELDROUTE_CHECK_IN_POLICY
        if let Ok(raw) = env::var("FIELDROUTE_CHECK_IN_POLICY") {
            match parse_check_in_policy(&raw) {
                Ok(policy) => self.check_in_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIELDROUTE_CHECK_IN_POLICY value '{}': expected reject or replace",
                    raw
                ),
            }
        }

        // FIELDROUTE_DATA_DIR
        if let Ok(raw) = env::var("FIELDROUTE_DATA_DIR") {
            if raw.trim().is_empty() {
                tracing::warn!("Ignoring empty FIELDROUTE_DATA_DIR");
            } else {
                self.data_dir.update(PathBuf::from(raw), ConfigSource::Environment);
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(high_accuracy) = overrides.high_accuracy {
            self.high_accuracy.update(high_accuracy, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.location_timeout_ms {
            self.location_timeout_ms.update(timeout, ConfigSource::Cli);
        }

        if let Some(max_age) = overrides.max_cache_age_ms {
            self.max_cache_age_ms.update(max_age, ConfigSource::Cli);
        }

        if let Some(policy) = overrides.check_in_policy {
            self.check_in_policy.update(policy, ConfigSource::Cli);
        }

        if let Some(data_dir) = overrides.data_dir {
            self.data_dir.update(data_dir, ConfigSource::Cli);
        }
    }

    /// Options handed to the geolocation provider
    pub fn geolocation_options(&self) -> GeolocationOptions {
        GeolocationOptions {
            enable_high_accuracy: self.high_accuracy.value,
            timeout_ms: self.location_timeout_ms.value,
            max_cache_age_ms: self.max_cache_age_ms.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "high_accuracy".to_string(),
            (self.high_accuracy.value.to_string(), self.high_accuracy.source),
        );

        map.insert(
            "location_timeout_ms".to_string(),
            (self.location_timeout_ms.value.to_string(), self.location_timeout_ms.source),
        );

        map.insert(
            "max_cache_age_ms".to_string(),
            (self.max_cache_age_ms.value.to_string(), self.max_cache_age_ms.source),
        );

        map.insert(
            "check_in_policy".to_string(),
            (format!("{:?}", self.check_in_policy.value), self.check_in_policy.source),
        );

        map.insert(
            "data_dir".to_string(),
            (self.data_dir.value.display().to_string(), self.data_dir.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    high_accuracy: Option<bool>,
    location_timeout_ms: Option<u64>,
    max_cache_age_ms: Option<u64>,
    check_in_policy: Option<CheckInPolicy>,
    data_dir: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub high_accuracy: Option<bool>,
    pub location_timeout_ms: Option<u64>,
    pub max_cache_age_ms: Option<u64>,
    pub check_in_policy: Option<CheckInPolicy>,
    pub data_dir: Option<PathBuf>,
}

/// Parse check-in policy from string
pub fn parse_check_in_policy(s: &str) -> Result<CheckInPolicy> {
    match s.to_lowercase().as_str() {
        "reject" => Ok(CheckInPolicy::Reject),
        "replace" => Ok(CheckInPolicy::Replace),
        _ => Err(FieldrouteError::ConfigInvalid {
            key: "check_in_policy".to_string(),
            reason: format!("Invalid check-in policy: {}. Use reject or replace", s),
        }),
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(FieldrouteError::ConfigInvalid {
            key: "high_accuracy".to_string(),
            reason: format!("Invalid boolean: {}", s),
        }),
    }
}

//! Configuration management for faultline.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::defect::Position;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "faultline";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FAULTLINE_`)
/// 2. TOML config file at `~/.config/faultline/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API configuration.
    pub api: ApiConfig,
    /// Location provider configuration.
    pub location: LocationConfig,
    /// Report form configuration.
    pub report: ReportConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the defect backend.
    pub base_url: String,
    /// Request timeout in seconds. Requests running past this fail.
    pub timeout_secs: u64,
}

/// Location provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// GeoIP lookup endpoint used when no fixed coordinates are set.
    pub geoip_url: String,
    /// Lookup timeout in seconds.
    pub timeout_secs: u64,
    /// Fixed latitude, for installations at a known site.
    /// Must be set together with `longitude`.
    pub latitude: Option<f64>,
    /// Fixed longitude. Must be set together with `latitude`.
    pub longitude: Option<f64>,
}

/// Report form configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Laboratory to prefill when the report doesn't name one.
    pub default_lab: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            geoip_url: "http://ip-api.com/json".to_string(),
            timeout_secs: 10,
            latitude: None,
            longitude: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FAULTLINE_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("FAULTLINE_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::config_validation("api.base_url must not be empty"));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config_validation(
                "api.timeout_secs must be greater than 0",
            ));
        }

        if self.location.timeout_secs == 0 {
            return Err(Error::config_validation(
                "location.timeout_secs must be greater than 0",
            ));
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::config_validation(
                    "location.latitude and location.longitude must be set together",
                ));
            }
            (Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) {
                    return Err(Error::config_validation(format!(
                        "location.latitude ({latitude}) must be between -90 and 90"
                    )));
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    return Err(Error::config_validation(format!(
                        "location.longitude ({longitude}) must be between -180 and 180"
                    )));
                }
            }
            (None, None) => {}
        }

        Ok(())
    }

    /// Get the API request timeout as a Duration.
    #[must_use]
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Get the location lookup timeout as a Duration.
    #[must_use]
    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location.timeout_secs)
    }

    /// Get the configured fixed position, if both halves are set.
    #[must_use]
    pub fn fixed_position(&self) -> Option<Position> {
        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://127.0.0.1:3000/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.location.geoip_url, "http://ip-api.com/json");
        assert_eq!(config.location.timeout_secs, 10);
        assert!(config.report.default_lab.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.api.base_url = "   ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_validate_zero_api_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("api.timeout_secs"));
    }

    #[test]
    fn test_validate_zero_location_timeout() {
        let mut config = Config::default();
        config.location.timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("location.timeout_secs"));
    }

    #[test]
    fn test_validate_lone_latitude() {
        let mut config = Config::default();
        config.location.latitude = Some(-23.55052);

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("set together"));
    }

    #[test]
    fn test_validate_lone_longitude() {
        let mut config = Config::default();
        config.location.longitude = Some(-46.633308);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_latitude_out_of_range() {
        let mut config = Config::default();
        config.location.latitude = Some(91.0);
        config.location.longitude = Some(0.0);

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("latitude"));
    }

    #[test]
    fn test_validate_longitude_out_of_range() {
        let mut config = Config::default();
        config.location.latitude = Some(0.0);
        config.location.longitude = Some(-181.0);

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("longitude"));
    }

    #[test]
    fn test_fixed_position_absent_by_default() {
        let config = Config::default();
        assert!(config.fixed_position().is_none());
    }

    #[test]
    fn test_fixed_position_present_when_both_set() {
        let mut config = Config::default();
        config.location.latitude = Some(-23.55052);
        config.location.longitude = Some(-46.633308);

        assert_eq!(
            config.fixed_position(),
            Some(Position::new(-23.55052, -46.633308))
        );
    }

    #[test]
    fn test_api_timeout() {
        let config = Config::default();
        assert_eq!(config.api_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_location_timeout() {
        let mut config = Config::default();
        config.location.timeout_secs = 3;
        assert_eq!(config.location_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("faultline"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_api_config_deserialize() {
        let json = r#"{"base_url": "http://192.168.0.100:3000/api", "timeout_secs": 5}"#;
        let api: ApiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(api.base_url, "http://192.168.0.100:3000/api");
        assert_eq!(api.timeout_secs, 5);
    }

    #[test]
    fn test_location_config_deserialize_partial() {
        let json = r#"{"latitude": -23.5, "longitude": -46.6}"#;
        let location: LocationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(location.latitude, Some(-23.5));
        assert_eq!(location.geoip_url, "http://ip-api.com/json");
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("base_url"));
        assert!(json.contains("geoip_url"));
        assert!(json.contains("default_lab"));
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}

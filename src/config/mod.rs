//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Channel band and learning hyperparameter parsing
//! - Optional telemetry and SMS collaborator settings
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use agri_sentinel::config::{validate_config, Config};
//! use agri_sentinel::sensors::Channel;
//!
//! // Use Config::from_env() in production
//! let config = Config::default();
//! assert_eq!(config.bands[Channel::Light].high, 900.0);
//! assert!(config.telemetry.is_none());
//! assert!(validate_config(&config).is_ok());
//! ```

mod collaborators;
mod secret;
mod validation;

pub use collaborators::{
    SmsConfig, TelemetryConfig, DEFAULT_ADAFRUIT_BASE_URL, DEFAULT_FAST2SMS_BASE_URL,
};
pub use secret::SecretString;
pub use validation::{
    validate_config, MAX_HTTP_TIMEOUT_MS, MAX_RETRY_DELAY_MS, MAX_TICK_INTERVAL_MS,
    MIN_HTTP_TIMEOUT_MS, MIN_TICK_INTERVAL_MS,
};

use crate::error::ConfigError;
use crate::ingest::STDIN_SOURCE;
use crate::learning::PolicyParams;
use crate::sensors::{Band, Channel, ChannelBands};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default interval between ticks in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2_000;

/// Default pause after a transport error in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 3_000;

/// Default HTTP timeout for collaborator calls in milliseconds.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Application configuration.
///
/// Bands and hyperparameters are fixed for the lifetime of the process.
/// Telemetry and SMS delivery are enabled only when their credentials are
/// present.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sensor source: `-` for stdin, otherwise a file or TTY path.
    pub sensor_source: String,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Interval between ticks in milliseconds.
    pub tick_interval_ms: u64,
    /// Pause after a transport error in milliseconds.
    pub retry_delay_ms: u64,
    /// Timeout for telemetry and SMS requests in milliseconds.
    pub http_timeout_ms: u64,
    /// Operating band per channel.
    pub bands: ChannelBands,
    /// Learning hyperparameters shared by every channel policy.
    pub policy: PolicyParams,
    /// Seed for reproducible exploration.
    pub policy_seed: Option<u64>,
    /// Adafruit IO forwarding, if enabled.
    pub telemetry: Option<TelemetryConfig>,
    /// Fast2SMS alert delivery, if enabled.
    pub sms: Option<SmsConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor_source: STDIN_SOURCE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            bands: ChannelBands::default(),
            policy: PolicyParams::default(),
            policy_seed: None,
            telemetry: None,
            sms: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `SENSOR_SOURCE`: `-` (stdin) or a device/file path (default: `-`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `TICK_INTERVAL_MS`: Tick cadence (default: `2000`)
    /// - `RETRY_DELAY_MS`: Pause after a transport error (default: `3000`)
    /// - `HTTP_TIMEOUT_MS`: Collaborator request timeout (default: `10000`)
    /// - `BAND_SOIL`, `BAND_TEMPERATURE`, `BAND_HUMIDITY`, `BAND_LIGHT`:
    ///   `low,high` (defaults: `30,80`, `15,40`, `30,80`, `300,900`)
    /// - `POLICY_ALPHA`, `POLICY_GAMMA`, `POLICY_EPSILON_DECAY`,
    ///   `POLICY_EPSILON_MIN` (defaults: `0.1`, `0.9`, `0.995`, `0.01`)
    /// - `POLICY_SEED`: exploration seed (default: OS entropy)
    ///
    /// See [`TelemetryConfig::from_env`] and [`SmsConfig::from_env`] for
    /// the collaborator variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value fails to parse, a collaborator
    /// is half-configured, or validation fails (see [`validate_config`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let sensor_source =
            std::env::var("SENSOR_SOURCE").unwrap_or_else(|_| defaults.sensor_source.clone());
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| defaults.log_level.clone());

        let tick_interval_ms = parse_env_u64("TICK_INTERVAL_MS", DEFAULT_TICK_INTERVAL_MS)?;
        let retry_delay_ms = parse_env_u64("RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?;
        let http_timeout_ms = parse_env_u64("HTTP_TIMEOUT_MS", DEFAULT_HTTP_TIMEOUT_MS)?;

        let mut bands = defaults.bands;
        for channel in Channel::ALL {
            let var = band_var(channel);
            if let Ok(raw) = std::env::var(&var) {
                bands[channel] = parse_band(&var, &raw)?;
            }
        }

        let policy = PolicyParams {
            alpha: parse_env_f64("POLICY_ALPHA", defaults.policy.alpha)?,
            gamma: parse_env_f64("POLICY_GAMMA", defaults.policy.gamma)?,
            epsilon_decay: parse_env_f64("POLICY_EPSILON_DECAY", defaults.policy.epsilon_decay)?,
            epsilon_min: parse_env_f64("POLICY_EPSILON_MIN", defaults.policy.epsilon_min)?,
            ..defaults.policy
        };
        let policy_seed = std::env::var("POLICY_SEED")
            .ok()
            .map(|val| {
                val.parse().map_err(|_| ConfigError::InvalidValue {
                    var: "POLICY_SEED".into(),
                    reason: "must be an unsigned integer".into(),
                })
            })
            .transpose()?;

        let config = Self {
            sensor_source,
            log_level,
            tick_interval_ms,
            retry_delay_ms,
            http_timeout_ms,
            bands,
            policy,
            policy_seed,
            telemetry: TelemetryConfig::from_env()?,
            sms: SmsConfig::from_env()?,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// Environment variable holding `channel`'s band.
fn band_var(channel: Channel) -> String {
    format!("BAND_{}", channel.name().to_uppercase())
}

/// Parse a `low,high` band.
fn parse_band(var: &str, raw: &str) -> Result<Band, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: var.into(),
        reason: reason.into(),
    };
    let (low, high) = raw
        .split_once(',')
        .ok_or_else(|| invalid("must be formatted as low,high"))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|_| invalid("low bound must be a number"))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|_| invalid("high bound must be a number"))?;
    Ok(Band::new(low, high))
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an environment variable as f64, using a default if not set.
fn parse_env_f64(name: &str, default: f64) -> Result<f64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a number".into(),
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "SENSOR_SOURCE",
        "LOG_LEVEL",
        "TICK_INTERVAL_MS",
        "RETRY_DELAY_MS",
        "HTTP_TIMEOUT_MS",
        "BAND_SOIL",
        "BAND_TEMPERATURE",
        "BAND_HUMIDITY",
        "BAND_LIGHT",
        "POLICY_ALPHA",
        "POLICY_GAMMA",
        "POLICY_EPSILON_DECAY",
        "POLICY_EPSILON_MIN",
        "POLICY_SEED",
        "ADAFRUIT_IO_USERNAME",
        "ADAFRUIT_IO_KEY",
        "ADAFRUIT_IO_BASE_URL",
        "FEED_SOIL",
        "FEED_TEMPERATURE",
        "FEED_HUMIDITY",
        "FEED_LIGHT",
        "FAST2SMS_API_KEY",
        "ALERT_PHONE",
        "FAST2SMS_BASE_URL",
    ];

    /// Helper to set up a clean test environment.
    pub(super) fn setup_test_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        setup_test_env();

        let config = Config::from_env().expect("should load config");
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_config_from_env_with_overrides() {
        setup_test_env();

        env::set_var("SENSOR_SOURCE", "/dev/ttyUSB0");
        env::set_var("LOG_LEVEL", "debug");
        env::set_var("TICK_INTERVAL_MS", "500");
        env::set_var("BAND_SOIL", "35, 70");
        env::set_var("POLICY_ALPHA", "0.2");
        env::set_var("POLICY_SEED", "1234");

        let config = Config::from_env().expect("should load config");

        assert_eq!(config.sensor_source, "/dev/ttyUSB0");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.bands[Channel::Soil], Band::new(35.0, 70.0));
        assert_eq!(config.bands[Channel::Light], Band::new(300.0, 900.0));
        assert_eq!(config.policy.alpha, 0.2);
        assert_eq!(config.policy.gamma, 0.9);
        assert_eq!(config.policy_seed, Some(1234));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_invalid_band_format() {
        setup_test_env();
        env::set_var("BAND_HUMIDITY", "30-80");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "BAND_HUMIDITY"
        ));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_inverted_band_rejected() {
        setup_test_env();
        env::set_var("BAND_LIGHT", "900,300");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "BAND_LIGHT"
        ));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_invalid_interval_format() {
        setup_test_env();
        env::set_var("TICK_INTERVAL_MS", "soon");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "TICK_INTERVAL_MS"
        ));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_invalid_seed() {
        setup_test_env();
        env::set_var("POLICY_SEED", "-1");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "POLICY_SEED"
        ));

        setup_test_env();
    }

    #[test]
    fn test_band_var_names() {
        assert_eq!(band_var(Channel::Soil), "BAND_SOIL");
        assert_eq!(band_var(Channel::Temperature), "BAND_TEMPERATURE");
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = Config {
            sms: Some(SmsConfig {
                api_key: SecretString::new("fast2sms-secret"),
                phone: "9000000000".to_string(),
                base_url: DEFAULT_FAST2SMS_BASE_URL.to_string(),
            }),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("<REDACTED>"));
        assert!(!debug.contains("fast2sms-secret"));
    }
}

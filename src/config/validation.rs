//! Configuration validation.
//!
//! Checks ranges for timing values, band ordering and learning
//! hyperparameters, and that enabled collaborators carry usable
//! credentials.

use super::Config;
use crate::error::ConfigError;
use crate::sensors::Channel;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Maximum tick interval in milliseconds (1 minute).
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;

/// Maximum pause after a transport error (5 minutes).
pub const MAX_RETRY_DELAY_MS: u64 = 300_000;

/// Minimum collaborator HTTP timeout (1 second).
pub const MIN_HTTP_TIMEOUT_MS: u64 = 1_000;

/// Maximum collaborator HTTP timeout (2 minutes).
pub const MAX_HTTP_TIMEOUT_MS: u64 = 120_000;

fn invalid(var: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason: reason.into(),
    }
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the offending variable if:
/// - `TICK_INTERVAL_MS` is outside 100..=60000
/// - `RETRY_DELAY_MS` exceeds 300000
/// - `HTTP_TIMEOUT_MS` is outside 1000..=120000
/// - a `BAND_*` bound is not finite or `low > high`
/// - `POLICY_ALPHA` or `POLICY_EPSILON_DECAY` is outside `(0, 1]`
/// - `POLICY_GAMMA` or `POLICY_EPSILON_MIN` is outside `[0, 1]`
/// - an enabled collaborator has an empty key, username or phone
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&config.tick_interval_ms) {
        return Err(invalid(
            "TICK_INTERVAL_MS",
            format!("must be between {MIN_TICK_INTERVAL_MS} and {MAX_TICK_INTERVAL_MS} ms"),
        ));
    }

    if config.retry_delay_ms > MAX_RETRY_DELAY_MS {
        return Err(invalid(
            "RETRY_DELAY_MS",
            format!("must be at most {MAX_RETRY_DELAY_MS} ms"),
        ));
    }

    if !(MIN_HTTP_TIMEOUT_MS..=MAX_HTTP_TIMEOUT_MS).contains(&config.http_timeout_ms) {
        return Err(invalid(
            "HTTP_TIMEOUT_MS",
            format!("must be between {MIN_HTTP_TIMEOUT_MS} and {MAX_HTTP_TIMEOUT_MS} ms"),
        ));
    }

    for channel in Channel::ALL {
        let band = config.bands[channel];
        let var = format!("BAND_{}", channel.name().to_uppercase());
        if !band.low.is_finite() || !band.high.is_finite() {
            return Err(invalid(var, "bounds must be finite"));
        }
        if band.low > band.high {
            return Err(invalid(var, "low bound must not exceed high bound"));
        }
    }

    let policy = &config.policy;
    if !(policy.alpha > 0.0 && policy.alpha <= 1.0) {
        return Err(invalid("POLICY_ALPHA", "must be in (0, 1]"));
    }
    if !(0.0..=1.0).contains(&policy.gamma) {
        return Err(invalid("POLICY_GAMMA", "must be in [0, 1]"));
    }
    if !(policy.epsilon_decay > 0.0 && policy.epsilon_decay <= 1.0) {
        return Err(invalid("POLICY_EPSILON_DECAY", "must be in (0, 1]"));
    }
    if !(0.0..=1.0).contains(&policy.epsilon_min) {
        return Err(invalid("POLICY_EPSILON_MIN", "must be in [0, 1]"));
    }

    if let Some(telemetry) = &config.telemetry {
        if telemetry.username.trim().is_empty() {
            return Err(invalid("ADAFRUIT_IO_USERNAME", "must not be empty"));
        }
        if telemetry.api_key.is_empty() {
            return Err(invalid("ADAFRUIT_IO_KEY", "must not be empty"));
        }
    }

    if let Some(sms) = &config.sms {
        if sms.api_key.is_empty() {
            return Err(invalid("FAST2SMS_API_KEY", "must not be empty"));
        }
        if sms.phone.trim().is_empty() {
            return Err(invalid("ALERT_PHONE", "must not be empty"));
        }
    }

    Ok(())
}

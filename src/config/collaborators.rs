//! Settings for the optional telemetry and SMS collaborators.
//!
//! Each collaborator is enabled only when its credentials are set. Setting
//! one credential without its partner is a configuration error rather
//! than a silent disable.

use std::env;

use super::SecretString;
use crate::error::ConfigError;
use crate::sensors::{Channel, ChannelMap};

/// Default Adafruit IO REST API base URL.
pub const DEFAULT_ADAFRUIT_BASE_URL: &str = "https://io.adafruit.com/api/v2";

/// Default Fast2SMS base URL.
pub const DEFAULT_FAST2SMS_BASE_URL: &str = "https://www.fast2sms.com";

/// Adafruit IO telemetry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Adafruit IO username.
    pub username: String,
    /// Adafruit IO key (protected from logging).
    pub api_key: SecretString,
    /// REST API base URL.
    pub base_url: String,
    /// Feed key per channel; channels without a feed are not forwarded.
    pub feeds: ChannelMap<Option<String>>,
}

impl TelemetryConfig {
    /// Feed keys used when no `FEED_*` variable is set.
    ///
    /// Humidity has no feed by default.
    #[must_use]
    pub fn default_feeds() -> ChannelMap<Option<String>> {
        ChannelMap::from_fn(|channel| match channel {
            Channel::Soil => Some("soil".to_string()),
            Channel::Temperature => Some("temp".to_string()),
            Channel::Light => Some("light".to_string()),
            Channel::Humidity => None,
        })
    }

    /// Load telemetry settings from the environment.
    ///
    /// Variables:
    /// - `ADAFRUIT_IO_USERNAME` and `ADAFRUIT_IO_KEY`: enable forwarding
    /// - `ADAFRUIT_IO_BASE_URL`: API base (default: Adafruit IO v2)
    /// - `FEED_SOIL`, `FEED_TEMPERATURE`, `FEED_HUMIDITY`, `FEED_LIGHT`:
    ///   feed keys; an empty value disables that channel
    ///
    /// Returns `Ok(None)` when neither credential is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if only one credential is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some((username, api_key)) = paired("ADAFRUIT_IO_USERNAME", "ADAFRUIT_IO_KEY")? else {
            return Ok(None);
        };

        let mut feeds = Self::default_feeds();
        for (channel, feed) in feeds.iter_mut() {
            if let Ok(value) = env::var(format!("FEED_{}", channel.name().to_uppercase())) {
                let value = value.trim().to_string();
                *feed = (!value.is_empty()).then_some(value);
            }
        }

        Ok(Some(Self {
            username,
            api_key: SecretString::new(api_key),
            base_url: env::var("ADAFRUIT_IO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ADAFRUIT_BASE_URL.into()),
            feeds,
        }))
    }
}

/// Fast2SMS delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsConfig {
    /// Fast2SMS API key (protected from logging).
    pub api_key: SecretString,
    /// Destination phone number(s), comma-separated.
    pub phone: String,
    /// Gateway base URL.
    pub base_url: String,
}

impl SmsConfig {
    /// Load SMS settings from the environment.
    ///
    /// Variables:
    /// - `FAST2SMS_API_KEY` and `ALERT_PHONE`: enable delivery
    /// - `FAST2SMS_BASE_URL`: gateway base (default: Fast2SMS)
    ///
    /// Returns `Ok(None)` when neither is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if only one is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some((api_key, phone)) = paired("FAST2SMS_API_KEY", "ALERT_PHONE")? else {
            return Ok(None);
        };

        Ok(Some(Self {
            api_key: SecretString::new(api_key),
            phone,
            base_url: env::var("FAST2SMS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FAST2SMS_BASE_URL.into()),
        }))
    }
}

/// Read two variables that must be set together.
fn paired(first: &str, second: &str) -> Result<Option<(String, String)>, ConfigError> {
    match (env::var(first).ok(), env::var(second).ok()) {
        (None, None) => Ok(None),
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (Some(_), None) => Err(ConfigError::MissingRequired { var: second.into() }),
        (None, Some(_)) => Err(ConfigError::MissingRequired { var: first.into() }),
    }
}

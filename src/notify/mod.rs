//! Alert delivery over the Fast2SMS bulk API.
//!
//! The notifier sends one SMS per alert event and never retries; the core
//! guarantees at most one event per excursion, not delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::alerts::AlertEvent;
use crate::config::SmsConfig;
use crate::error::NotifyError;
use crate::traits::Notifier;

/// Path of the bulk SMS endpoint under the gateway base URL.
const BULK_PATH: &str = "/dev/bulkV2";

/// Maximum response body characters kept in errors.
const MAX_ERROR_BODY: usize = 200;

/// Render the SMS text for an alert event.
///
/// # Example
///
/// ```
/// use agri_sentinel::alerts::AlertEvent;
/// use agri_sentinel::notify::format_alert_message;
/// use agri_sentinel::sensors::{Band, Channel};
///
/// let event = AlertEvent { channel: Channel::Soil, value: 25.0, band: Band::new(30.0, 80.0) };
/// assert_eq!(format_alert_message(&event), "SOIL ALERT: 25.00 out of range [30-80]");
/// ```
#[must_use]
pub fn format_alert_message(event: &AlertEvent) -> String {
    format!(
        "{} ALERT: {:.2} out of range {}",
        event.channel.name().to_uppercase(),
        event.value,
        event.band
    )
}

#[derive(Debug, Serialize)]
struct BulkRequest<'a> {
    sender_id: &'a str,
    message: String,
    language: &'a str,
    route: &'a str,
    numbers: &'a str,
}

/// Fast2SMS notifier.
#[derive(Debug)]
pub struct Fast2SmsNotifier {
    client: Client,
    config: SmsConfig,
}

impl Fast2SmsNotifier {
    /// Create a notifier with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Network`] if the HTTP client cannot be built.
    pub fn new(config: SmsConfig, timeout_ms: u64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| NotifyError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for Fast2SmsNotifier {
    async fn notify(&self, event: AlertEvent) -> Result<(), NotifyError> {
        let url = format!("{}{BULK_PATH}", self.config.base_url.trim_end_matches('/'));
        let request = BulkRequest {
            sender_id: "FSTSMS",
            message: format_alert_message(&event),
            language: "english",
            route: "q",
            numbers: &self.config.phone,
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.config.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

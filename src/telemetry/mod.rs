//! Telemetry forwarding to Adafruit IO.
//!
//! Each configured channel's raw reading is written to its feed with
//! `POST {base}/{username}/feeds/{feed}/data`. Forwarding is independent
//! of the decision made on the tick and never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::TelemetryConfig;
use crate::error::TelemetryError;
use crate::sensors::Sample;
use crate::traits::TelemetrySink;

/// Header carrying the Adafruit IO key.
const AIO_KEY_HEADER: &str = "X-AIO-Key";

#[derive(Debug, Serialize)]
struct DataPoint {
    value: f64,
}

/// Adafruit IO feed writer.
#[derive(Debug)]
pub struct AdafruitForwarder {
    client: Client,
    config: TelemetryConfig,
}

impl AdafruitForwarder {
    /// Create a forwarder with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Network`] if the HTTP client cannot be built.
    pub fn new(config: TelemetryConfig, timeout_ms: u64) -> Result<Self, TelemetryError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| TelemetryError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn feed_url(&self, feed: &str) -> String {
        format!(
            "{}/{}/feeds/{}/data",
            self.config.base_url.trim_end_matches('/'),
            self.config.username,
            feed
        )
    }

    async fn send(&self, feed: &str, value: f64) -> Result<(), TelemetryError> {
        let response = self
            .client
            .post(self.feed_url(feed))
            .header(AIO_KEY_HEADER, self.config.api_key.expose())
            .json(&DataPoint { value })
            .send()
            .await
            .map_err(|e| TelemetryError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Rejected {
                status: status.as_u16(),
                feed: feed.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TelemetrySink for AdafruitForwarder {
    async fn forward(&self, sample: Sample) -> Result<(), TelemetryError> {
        let mut first_error = None;
        for (channel, reading) in sample.readings() {
            let Some(feed) = self.config.feeds[channel].as_deref() else {
                continue;
            };
            if let Err(e) = self.send(feed, reading).await {
                tracing::debug!(channel = %channel, feed, error = %e, "Feed write failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

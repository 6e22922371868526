//! Trait definitions for the collaborators around the decision core.
//!
//! This module defines traits for:
//! - [`SampleSource`]: acquisition of validated samples
//! - [`TelemetrySink`]: fire-and-forget forwarding of raw readings
//! - [`Notifier`]: delivery of debounced alert events
//! - [`TickDisplay`]: presentation of tick results
//! - [`TimeProvider`]: time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use agri_sentinel::traits::{RealTimeProvider, TimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::alerts::AlertEvent;
use crate::error::{IngestError, NotifyError, TelemetryError};
use crate::monitor::TickResult;
use crate::sensors::Sample;

/// Source of validated samples.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SampleSource: Send {
    /// Wait for the next sample.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] for a malformed line, a transport failure,
    /// or [`IngestError::Closed`] at end of stream.
    async fn next_sample(&mut self) -> Result<Sample, IngestError>;
}

/// Destination for raw per-tick readings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Forward every configured channel's reading.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if any write fails.
    async fn forward(&self, sample: Sample) -> Result<(), TelemetryError>;
}

/// Delivery channel for alert events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert event.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails.
    async fn notify(&self, event: AlertEvent) -> Result<(), NotifyError>;
}

/// Read-only presentation of tick results.
#[cfg_attr(test, mockall::automock)]
pub trait TickDisplay: Send {
    /// Present one tick.
    fn show(&mut self, result: &TickResult);
}

/// Time provider trait for deterministic testing.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//! Recording collaborators for service tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use agri_sentinel::alerts::AlertEvent;
use agri_sentinel::error::{NotifyError, TelemetryError};
use agri_sentinel::ingest::LineSource;
use agri_sentinel::learning::PolicyParams;
use agri_sentinel::monitor::{MonitoringLoop, TickResult};
use agri_sentinel::sensors::{ChannelBands, Sample};
use agri_sentinel::service::MonitorService;
use agri_sentinel::traits::{Notifier, TelemetrySink, TickDisplay};
use async_trait::async_trait;
use std::io::Cursor;
use std::time::Duration;

/// Display that keeps every tick it is shown.
#[derive(Debug, Clone, Default)]
pub struct CollectingDisplay {
    pub ticks: Arc<Mutex<Vec<TickResult>>>,
}

impl CollectingDisplay {
    pub fn shown(&self) -> Vec<TickResult> {
        self.ticks.lock().unwrap().clone()
    }
}

impl TickDisplay for CollectingDisplay {
    fn show(&mut self, result: &TickResult) {
        self.ticks.lock().unwrap().push(result.clone());
    }
}

/// Notifier that records events and optionally fails.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<AlertEvent>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: AlertEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event);
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 503,
                body: "gateway unavailable".into(),
            });
        }
        Ok(())
    }
}

/// Telemetry sink that records samples and optionally fails.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub samples: Mutex<Vec<Sample>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelemetrySink for RecordingSink {
    async fn forward(&self, sample: Sample) -> Result<(), TelemetryError> {
        self.samples.lock().unwrap().push(sample);
        if self.fail {
            return Err(TelemetryError::Network {
                message: "connection refused".into(),
            });
        }
        Ok(())
    }
}

/// Exploiting core with default bands.
pub fn exploiting_core() -> MonitoringLoop {
    let mut core = MonitoringLoop::new(ChannelBands::default(), PolicyParams::default(), Some(7));
    core.set_epsilon(0.0);
    core
}

/// A fast-paced service reading `input` line by line.
pub fn service_over(input: &str, display: CollectingDisplay) -> MonitorService {
    let source = LineSource::new(Cursor::new(input.as_bytes().to_vec()));
    MonitorService::new(Box::new(source), exploiting_core(), Box::new(display))
        .with_tick_interval(Duration::from_millis(1))
        .with_retry_delay(Duration::from_millis(1))
}

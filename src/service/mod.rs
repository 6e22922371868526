//! The running service: ingestion, the monitoring loop and collaborators.
//!
//! [`MonitorService::run`] paces ticks with a tokio interval, pulls one
//! sample per tick, runs it through the [`MonitoringLoop`], then hands the
//! result to the display and spawns telemetry and alert delivery as
//! detached tasks. Collaborator failures are logged and counted; they
//! never stop the loop or touch learned state.
//!
//! A shutdown signal is honored between ticks and while waiting for input,
//! never in the middle of a tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::config::{DEFAULT_RETRY_DELAY_MS, DEFAULT_TICK_INTERVAL_MS};
use crate::error::IngestError;
use crate::metrics::{MetricsSummary, ServiceMetrics};
use crate::monitor::{MonitoringLoop, TickResult};
use crate::notify::format_alert_message;
use crate::traits::{Notifier, SampleSource, TelemetrySink, TickDisplay};

/// Why the service loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A shutdown signal was received.
    Shutdown,
    /// The sample source reached end of stream.
    SourceClosed,
}

/// Final state reported when the loop exits.
#[derive(Debug, Clone)]
pub struct ServiceReport {
    /// Why the loop stopped.
    pub reason: StopReason,
    /// Counters at exit, after in-flight deliveries finished.
    pub metrics: MetricsSummary,
    /// The monitoring loop, with all learned state.
    pub core: MonitoringLoop,
}

/// Wires a sample source and collaborators around the monitoring loop.
pub struct MonitorService {
    source: Box<dyn SampleSource>,
    core: MonitoringLoop,
    display: Box<dyn TickDisplay>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    notifier: Option<Arc<dyn Notifier>>,
    metrics: Arc<ServiceMetrics>,
    tick_interval: Duration,
    retry_delay: Duration,
    in_flight: JoinSet<()>,
}

impl std::fmt::Debug for MonitorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorService")
            .field("ticks", &self.core.ticks())
            .field("telemetry", &self.telemetry.is_some())
            .field("notifier", &self.notifier.is_some())
            .field("tick_interval", &self.tick_interval)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl MonitorService {
    /// Create a service with default pacing and no remote collaborators.
    #[must_use]
    pub fn new(
        source: Box<dyn SampleSource>,
        core: MonitoringLoop,
        display: Box<dyn TickDisplay>,
    ) -> Self {
        Self {
            source,
            core,
            display,
            telemetry: None,
            notifier: None,
            metrics: Arc::new(ServiceMetrics::new()),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            in_flight: JoinSet::new(),
        }
    }

    /// Forward raw readings to `sink` on every tick.
    #[must_use]
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Deliver alert events through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the tick cadence.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the pause after a transport error.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Shared counters, readable while the service runs.
    #[must_use]
    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run until shutdown is signalled or the source closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ServiceReport {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.tick_interval.as_millis(),
            telemetry = self.telemetry.is_some(),
            notifications = self.notifier.is_some(),
            "Monitoring loop started"
        );

        let reason = loop {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown) => break StopReason::Shutdown,
                _ = interval.tick() => {}
            }

            let next = tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown) => break StopReason::Shutdown,
                next = self.source.next_sample() => next,
            };

            match next {
                Ok(sample) => {
                    let result = self.core.tick(&sample);
                    self.dispatch(&result);
                }
                Err(IngestError::Closed) => {
                    tracing::info!("Sensor source closed");
                    break StopReason::SourceClosed;
                }
                Err(e) if e.is_malformed_line() => {
                    self.metrics.record_rejected_line();
                    tracing::warn!(error = %e, "Rejected sensor line");
                }
                Err(e) => {
                    self.metrics.record_ingest_error();
                    tracing::error!(
                        error = %e,
                        retry_in_ms = self.retry_delay.as_millis(),
                        "Sensor read failed"
                    );
                    tokio::select! {
                        biased;
                        () = wait_for_shutdown(&mut shutdown) => break StopReason::Shutdown,
                        () = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
            self.reap_finished();
        };

        while self.in_flight.join_next().await.is_some() {}

        let metrics = self.metrics.summary();
        tracing::info!(
            reason = ?reason,
            ticks = metrics.ticks,
            alerts = metrics.alerts_raised,
            "Monitoring loop stopped"
        );

        ServiceReport {
            reason,
            metrics,
            core: self.core,
        }
    }

    /// Hand one tick to the display, telemetry and notifier.
    fn dispatch(&mut self, result: &TickResult) {
        self.metrics.record_tick(result.alerts.len());
        self.display.show(result);

        if let Some(sink) = &self.telemetry {
            let sink = Arc::clone(sink);
            let metrics = Arc::clone(&self.metrics);
            let sample = result.sample;
            self.in_flight.spawn(async move {
                if let Err(e) = sink.forward(sample).await {
                    metrics.record_telemetry_failure();
                    tracing::error!(error = %e, "Telemetry forward failed");
                }
            });
        }

        for event in &result.alerts {
            tracing::warn!(
                channel = %event.channel,
                value = event.value,
                band = %event.band,
                "{}",
                format_alert_message(event)
            );
            let Some(notifier) = &self.notifier else {
                continue;
            };
            let notifier = Arc::clone(notifier);
            let metrics = Arc::clone(&self.metrics);
            let event = *event;
            self.in_flight.spawn(async move {
                match notifier.notify(event).await {
                    Ok(()) => {
                        metrics.record_notification(true);
                        tracing::info!(channel = %event.channel, "Alert notification sent");
                    }
                    Err(e) => {
                        metrics.record_notification(false);
                        tracing::error!(channel = %event.channel, error = %e, "Alert notification failed");
                    }
                }
            });
        }
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.in_flight.try_join_next() {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Delivery task panicked");
            }
        }
    }
}

/// Resolve once shutdown is requested. A dropped sender never resolves.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

//! Tick presentation.
//!
//! This module provides:
//! - [`JsonLinesDisplay`]: one timestamped JSON object per tick on a writer
//! - [`LogDisplay`]: a one-line `tracing` summary per tick
//!
//! Displays are read-only consumers of [`TickResult`]; nothing flows back
//! into the monitoring loop.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::monitor::TickResult;
use crate::traits::{RealTimeProvider, TickDisplay, TimeProvider};

/// A tick result stamped with the time it was displayed.
#[derive(Debug, Serialize)]
pub struct TickRecord<'a> {
    /// Display time.
    pub at: DateTime<Utc>,
    /// The tick being displayed.
    #[serde(flatten)]
    pub result: &'a TickResult,
}

/// Writes one JSON object per tick, newline-delimited.
#[derive(Debug)]
pub struct JsonLinesDisplay<W, T = RealTimeProvider> {
    writer: W,
    clock: T,
}

impl<W: Write + Send> JsonLinesDisplay<W> {
    /// Create a display stamping records with the system clock.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            clock: RealTimeProvider,
        }
    }
}

impl<W: Write + Send, T: TimeProvider> JsonLinesDisplay<W, T> {
    /// Create a display with a custom clock.
    #[must_use]
    pub const fn with_clock(writer: W, clock: T) -> Self {
        Self { writer, clock }
    }

    /// Consume the display and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send, T: TimeProvider> TickDisplay for JsonLinesDisplay<W, T> {
    fn show(&mut self, result: &TickResult) {
        let record = TickRecord {
            at: self.clock.now(),
            result,
        };
        let written = serde_json::to_writer(&mut self.writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            tracing::error!(tick = result.tick, error = %e, "Failed to write tick record");
        }
    }
}

/// Logs a compact per-tick summary at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl TickDisplay for LogDisplay {
    fn show(&mut self, result: &TickResult) {
        let actions = result
            .decisions
            .iter()
            .map(|d| format!("{}={:.2}:{}", d.channel, d.reading, d.action))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(
            tick = result.tick,
            alerts = result.alerts.len(),
            counts = %serde_json::to_string(&result.alert_counts).unwrap_or_default(),
            "{actions}"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::learning::PolicyParams;
    use crate::monitor::MonitoringLoop;
    use crate::sensors::{ChannelBands, Sample};
    use crate::traits::MockTimeProvider;
    use chrono::TimeZone;

    fn tick() -> TickResult {
        let mut core =
            MonitoringLoop::new(ChannelBands::default(), PolicyParams::default(), Some(1));
        core.set_epsilon(0.0);
        core.tick(&Sample::new(25.0, 22.0, 50.0, 500.0))
    }

    #[test]
    fn test_json_lines_record() {
        let mut clock = MockTimeProvider::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2026, 5, 1, 6, 30, 0).unwrap());

        let mut display = JsonLinesDisplay::with_clock(Vec::new(), clock);
        display.show(&tick());
        let out = String::from_utf8(display.into_inner()).unwrap();

        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(json["at"], "2026-05-01T06:30:00Z");
        assert_eq!(json["tick"], 1);
        assert_eq!(json["sample"]["soil"], 25.0);
        assert_eq!(json["decisions"][3]["channel"], "light");
        assert_eq!(json["alerts"][0]["band"]["low"], 30.0);
        assert_eq!(json["alert_counts"]["light"], 0);
    }

    #[test]
    fn test_json_lines_one_line_per_tick() {
        let mut display = JsonLinesDisplay::new(Vec::new());
        let result = tick();
        display.show(&result);
        display.show(&result);
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_log_display_does_not_panic() {
        LogDisplay.show(&tick());
    }
}

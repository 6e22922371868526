//! Resilience integration tests.
//!
//! Tests that bad input and failing collaborators never halt the loop or
//! disturb learned state, and that shutdown lands between ticks.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use agri_sentinel::ingest::LineSource;
use agri_sentinel::sensors::Channel;
use agri_sentinel::service::{MonitorService, StopReason};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::watch;

use super::fakes::{exploiting_core, service_over, CollectingDisplay, RecordingNotifier, RecordingSink};

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let input = "\
50,20,50,500
50,20,50
soil,20,50,500
NaN,20,50,500

10,20,50,500
";
    let display = CollectingDisplay::default();
    let (_tx, rx) = watch::channel(false);

    let report = service_over(input, display.clone()).run(rx).await;

    assert_eq!(report.reason, StopReason::SourceClosed);
    assert_eq!(report.metrics.lines_rejected, 3);
    assert_eq!(report.metrics.ticks, 2);
    let ticks: Vec<u64> = display.shown().iter().map(|t| t.tick).collect();
    assert_eq!(ticks, vec![1, 2]);
    assert_eq!(report.metrics.alerts_raised, 1);
}

#[tokio::test]
async fn test_failing_collaborators_are_counted_not_fatal() {
    let input = "10,20,50,500\n50,20,50,500\n10,20,50,500\n";
    let notifier = Arc::new(RecordingNotifier::failing());
    let sink = Arc::new(RecordingSink::failing());
    let (_tx, rx) = watch::channel(false);

    let report = service_over(input, CollectingDisplay::default())
        .with_notifier(notifier.clone())
        .with_telemetry(sink.clone())
        .run(rx)
        .await;

    assert_eq!(report.reason, StopReason::SourceClosed);
    assert_eq!(report.metrics.ticks, 3);
    assert_eq!(report.metrics.alerts_raised, 2);
    assert_eq!(report.metrics.notifications_failed, 2);
    assert_eq!(report.metrics.notifications_sent, 0);
    assert_eq!(report.metrics.telemetry_failures, 3);
    assert_eq!(notifier.events().len(), 2);
    assert_eq!(sink.samples().len(), 3);
}

#[tokio::test]
async fn test_shutdown_stops_between_ticks() {
    let (mut writer, reader) = tokio::io::duplex(256);
    let display = CollectingDisplay::default();
    let source = LineSource::new(BufReader::new(reader));
    let service = MonitorService::new(Box::new(source), exploiting_core(), Box::new(display.clone()))
        .with_tick_interval(Duration::from_millis(1));
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(service.run(rx));

    writer.write_all(b"25,20,50,500\n50,20,50,500\n").await.unwrap();
    for _ in 0..200 {
        if display.shown().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tx.send(true).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("service should stop promptly")
        .unwrap();

    assert_eq!(report.reason, StopReason::Shutdown);
    assert_eq!(report.metrics.ticks, 2);
    assert_eq!(report.core.alert_counts()[Channel::Soil], 0);
    drop(writer);
}

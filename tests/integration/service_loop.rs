//! Service loop integration tests.
//!
//! Tests the full path: device lines → parsed samples → ticks →
//! display, telemetry forwarding and alert delivery.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use agri_sentinel::learning::Action;
use agri_sentinel::sensors::{Band, Channel, Sample};
use agri_sentinel::service::StopReason;
use pretty_assertions::assert_eq;
use tokio::sync::watch;

use super::fakes::{service_over, CollectingDisplay, RecordingNotifier, RecordingSink};

const FIELD_LOG: &str = "\
boot: sensor board v2
41.20V,22.5,55.0,640
25.00V,22.5,55.0,640
20.00V,22.5,55.0,640
45.00V,22.5,55.0,640
";

#[tokio::test]
async fn test_field_log_end_to_end() {
    let display = CollectingDisplay::default();
    let notifier = Arc::new(RecordingNotifier::default());
    let sink = Arc::new(RecordingSink::default());
    let (_tx, rx) = watch::channel(false);

    let report = service_over(FIELD_LOG, display.clone())
        .with_notifier(notifier.clone())
        .with_telemetry(sink.clone())
        .run(rx)
        .await;

    assert_eq!(report.reason, StopReason::SourceClosed);
    assert_eq!(report.metrics.ticks, 4);
    assert_eq!(report.metrics.lines_rejected, 0);
    assert_eq!(report.core.ticks(), 4);

    let shown = display.shown();
    assert_eq!(shown.len(), 4);
    assert_eq!(shown[0].sample, Sample::new(41.2, 22.5, 55.0, 640.0));
    assert_eq!(
        shown.iter().map(|t| t.tick).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].channel, Channel::Soil);
    assert_eq!(events[0].value, 25.0);
    assert_eq!(events[0].band, Band::new(30.0, 80.0));
    assert_eq!(report.metrics.notifications_sent, 1);

    assert_eq!(sink.samples().len(), 4);
}

#[tokio::test]
async fn test_display_sees_decisions_for_every_channel() {
    let display = CollectingDisplay::default();
    let (_tx, rx) = watch::channel(false);

    service_over("50,20,50,500\n", display.clone()).run(rx).await;

    let shown = display.shown();
    let channels: Vec<Channel> = shown[0].decisions.iter().map(|d| d.channel).collect();
    assert_eq!(channels, Channel::ALL.to_vec());
    for decision in &shown[0].decisions {
        assert_eq!(decision.action, Action::Wait);
        assert_eq!(decision.reward, 10.0);
    }
}

#[tokio::test]
async fn test_learned_state_survives_in_report() {
    let display = CollectingDisplay::default();
    let (_tx, rx) = watch::channel(false);

    let report = service_over("25,20,50,500\n25,20,50,500\n", display)
        .run(rx)
        .await;

    let soil = report.core.monitor(Channel::Soil).policy();
    let values = soil.values(25.0).expect("soil state learned");
    assert!(values[Action::Wait.index()] < 0.0);
    assert_eq!(soil.state_count(), 1);
}

#[tokio::test]
async fn test_empty_source_closes_immediately() {
    let display = CollectingDisplay::default();
    let (_tx, rx) = watch::channel(false);

    let report = service_over("", display.clone()).run(rx).await;

    assert_eq!(report.reason, StopReason::SourceClosed);
    assert_eq!(report.metrics.ticks, 0);
    assert!(display.shown().is_empty());
}

//! Agri Sentinel binary entry point.
//!
//! Tick records go to stdout as JSON lines; all logs go to stderr.
//!
//! Coverage is excluded because the main function wires real devices,
//! signals and remote services together.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;
use std::time::Duration;

use agri_sentinel::config::Config;
use agri_sentinel::display::JsonLinesDisplay;
use agri_sentinel::error::AppError;
use agri_sentinel::ingest::open_source;
use agri_sentinel::monitor::MonitoringLoop;
use agri_sentinel::notify::Fast2SmsNotifier;
use agri_sentinel::service::MonitorService;
use agri_sentinel::telemetry::AdafruitForwarder;
use tokio::sync::watch;

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    // Initialize logging to stderr only (stdout carries tick records)
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("agri-sentinel starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Configuration loaded: source={}, interval={}ms, seed={:?}",
        config.sensor_source,
        config.tick_interval_ms,
        config.policy_seed
    );

    if let Err(e) = run(config).await {
        tracing::error!("Service error: {e}");
        std::process::exit(1);
    }

    tracing::info!("agri-sentinel shutdown complete");
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run(config: Config) -> Result<(), AppError> {
    let source = open_source(&config.sensor_source).await?;
    let core = MonitoringLoop::new(config.bands, config.policy, config.policy_seed);
    let display = JsonLinesDisplay::new(std::io::stdout());

    let mut service = MonitorService::new(source, core, Box::new(display))
        .with_tick_interval(Duration::from_millis(config.tick_interval_ms))
        .with_retry_delay(Duration::from_millis(config.retry_delay_ms));

    if let Some(telemetry) = config.telemetry {
        tracing::info!(user = %telemetry.username, "Adafruit IO forwarding enabled");
        let forwarder = AdafruitForwarder::new(telemetry, config.http_timeout_ms)?;
        service = service.with_telemetry(Arc::new(forwarder));
    }
    if let Some(sms) = config.sms {
        tracing::info!("SMS alerts enabled");
        let notifier = Fast2SmsNotifier::new(sms, config.http_timeout_ms)?;
        service = service.with_notifier(Arc::new(notifier));
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        tracing::info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let report = service.run(shutdown_rx).await;
    tracing::info!(
        reason = ?report.reason,
        ticks = report.metrics.ticks,
        lines_rejected = report.metrics.lines_rejected,
        alerts = report.metrics.alerts_raised,
        notifications_sent = report.metrics.notifications_sent,
        notifications_failed = report.metrics.notifications_failed,
        telemetry_failures = report.metrics.telemetry_failures,
        "Final alert counts: {}",
        serde_json::to_string(&report.core.alert_counts()).unwrap_or_default()
    );
    Ok(())
}

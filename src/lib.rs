//! Agri Sentinel
//!
//! An adaptive field monitor: a stream of four-channel sensor samples
//! drives one tabular Q-learning policy and one alert debouncer per
//! channel, with raw readings forwarded to Adafruit IO and out-of-band
//! excursions delivered over SMS.
//!
//! # Features
//!
//! - Per-channel epsilon-greedy Q-learning over rounded readings
//! - Band-based reward model shared by every channel
//! - One alert event per out-of-band excursion
//! - Line ingestion from stdin, a file or a serial TTY
//! - Optional telemetry and SMS collaborators that never stall the loop
//!
//! # Quick Start
//!
//! ```bash
//! SENSOR_SOURCE=/dev/ttyACM0 ./agri-sentinel
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  lines   ┌────────────────────────────┐  JSON lines
//! │ Sensor     │─────────▶│  MonitorService            │───────────▶ stdout
//! │ board      │          │  ┌──────────────────────┐  │
//! └────────────┘          │  │ MonitoringLoop       │  │──────▶ Adafruit IO
//!                         │  │  4 × ChannelMonitor  │  │
//!                         │  └──────────────────────┘  │──────▶ Fast2SMS
//!                         └────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod alerts;
pub mod config;
pub mod display;
pub mod error;
pub mod ingest;
pub mod learning;
pub mod metrics;
pub mod monitor;
pub mod notify;
pub mod sensors;
pub mod service;
pub mod telemetry;
pub mod traits;

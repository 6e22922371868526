//! Channel monitors and the monitoring loop.
//!
//! [`ChannelMonitor`] owns one channel's policy, debouncer and alert
//! counter. [`MonitoringLoop`] holds one monitor per channel and turns
//! each [`Sample`](crate::sensors::Sample) into a [`TickResult`]. Neither
//! performs I/O; callers hand the result to the display, telemetry and
//! notification collaborators.
//!
//! # Example
//!
//! ```
//! use agri_sentinel::learning::PolicyParams;
//! use agri_sentinel::monitor::MonitoringLoop;
//! use agri_sentinel::sensors::{Channel, ChannelBands, Sample};
//!
//! let mut core = MonitoringLoop::new(ChannelBands::default(), PolicyParams::default(), Some(1));
//! let result = core.tick(&Sample::new(25.0, 22.0, 50.0, 500.0));
//!
//! assert_eq!(result.alerts.len(), 1);
//! assert_eq!(result.alerts[0].channel, Channel::Soil);
//! ```

mod channel;
mod tick;

pub use channel::{ChannelDecision, ChannelMonitor};
pub use tick::{MonitoringLoop, TickResult};

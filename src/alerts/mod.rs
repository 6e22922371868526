//! Alert debouncing.
//!
//! Each channel runs a two-state machine so that a sustained excursion
//! out of its band produces exactly one alert event, at the start of the
//! excursion. Returning to the band re-arms the channel silently.
//!
//! ```text
//!            out of band / emit
//!   Normal ─────────────────────▶ Alerting
//!     ▲  │ in band                  │  │ out of band
//!     │  └──┘                       │  └──┘
//!     └─────────────────────────────┘
//!               in band
//! ```

use serde::Serialize;

use crate::sensors::{Band, Channel};

/// Debounce state for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AlertState {
    /// Last reading was in band; the next excursion will alert.
    #[default]
    Normal,
    /// An excursion is in progress and has already alerted.
    Alerting,
}

/// Emitted once at the start of each excursion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertEvent {
    /// Channel that left its band.
    pub channel: Channel,
    /// Reading that triggered the alert.
    pub value: f64,
    /// Band the reading fell outside of.
    pub band: Band,
}

/// Two-state alert gate for a single channel.
#[derive(Debug, Clone)]
pub struct AlertDebouncer {
    channel: Channel,
    band: Band,
    state: AlertState,
}

impl AlertDebouncer {
    /// Create a debouncer in the [`AlertState::Normal`] state.
    #[must_use]
    pub const fn new(channel: Channel, band: Band) -> Self {
        Self {
            channel,
            band,
            state: AlertState::Normal,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AlertState {
        self.state
    }

    /// Band this debouncer gates on.
    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    /// Feed one reading; returns an event only on `Normal -> Alerting`.
    pub fn evaluate(&mut self, reading: f64) -> Option<AlertEvent> {
        let in_band = self.band.contains(reading);
        match (self.state, in_band) {
            (AlertState::Normal, false) => {
                self.state = AlertState::Alerting;
                Some(AlertEvent {
                    channel: self.channel,
                    value: reading,
                    band: self.band,
                })
            }
            (AlertState::Alerting, true) => {
                tracing::debug!(channel = %self.channel, reading, "Channel back in band");
                self.state = AlertState::Normal;
                None
            }
            (AlertState::Normal, true) | (AlertState::Alerting, false) => None,
        }
    }
}

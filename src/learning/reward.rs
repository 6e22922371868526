//! Reward model encoding the desired operating regime.
//!
//! In band, waiting is best and acting is tolerated. Out of band, acting is
//! neutral and waiting is penalized.

use super::types::Action;
use crate::sensors::{Channel, ChannelBands};

/// Reward for waiting while in band.
pub const REWARD_IN_BAND_WAIT: f64 = 10.0;
/// Reward for acting while in band.
pub const REWARD_IN_BAND_ACT: f64 = 5.0;
/// Reward for acting while out of band.
pub const REWARD_OUT_OF_BAND_ACT: f64 = 0.0;
/// Reward for waiting while out of band.
pub const REWARD_OUT_OF_BAND_WAIT: f64 = -5.0;

/// Maps `(channel, value, action)` to a scalar reward.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardModel {
    bands: ChannelBands,
}

impl RewardModel {
    /// Create a reward model over the given bands.
    #[must_use]
    pub const fn new(bands: ChannelBands) -> Self {
        Self { bands }
    }

    /// Bands this model scores against.
    #[must_use]
    pub const fn bands(&self) -> &ChannelBands {
        &self.bands
    }

    /// Score `action` taken while `channel` reads `value`.
    #[must_use]
    pub fn reward(&self, channel: Channel, value: f64, action: Action) -> f64 {
        let waited = action == Action::Wait;
        if self.bands[channel].contains(value) {
            if waited {
                REWARD_IN_BAND_WAIT
            } else {
                REWARD_IN_BAND_ACT
            }
        } else if waited {
            REWARD_OUT_OF_BAND_WAIT
        } else {
            REWARD_OUT_OF_BAND_ACT
        }
    }
}

impl Default for RewardModel {
    fn default() -> Self {
        Self::new(ChannelBands::default())
    }
}

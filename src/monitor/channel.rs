//! Per-channel composition of policy, reward and debouncer.

use std::sync::Arc;

use serde::Serialize;

use crate::alerts::{AlertDebouncer, AlertEvent, AlertState};
use crate::learning::{Action, DecisionPolicy, RewardModel};
use crate::sensors::Channel;

/// Outcome of processing one reading on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelDecision {
    /// Channel the reading belongs to.
    pub channel: Channel,
    /// Raw reading.
    pub reading: f64,
    /// Action chosen by the policy.
    pub action: Action,
    /// Reward the policy learned from.
    pub reward: f64,
    /// Debounced alert, present only at the start of an excursion.
    pub alert: Option<AlertEvent>,
}

/// Owns all learned and debounce state for one channel.
#[derive(Debug, Clone)]
pub struct ChannelMonitor {
    channel: Channel,
    policy: DecisionPolicy,
    debouncer: AlertDebouncer,
    rewards: Arc<RewardModel>,
    alert_count: u64,
}

impl ChannelMonitor {
    /// Create a monitor for `channel`, debouncing on the reward model's band.
    #[must_use]
    pub fn new(channel: Channel, policy: DecisionPolicy, rewards: Arc<RewardModel>) -> Self {
        let debouncer = AlertDebouncer::new(channel, rewards.bands()[channel]);
        Self {
            channel,
            policy,
            debouncer,
            rewards,
            alert_count: 0,
        }
    }

    /// Process one reading: decide, score, learn, then debounce.
    pub fn process(&mut self, reading: f64) -> ChannelDecision {
        let action = self.policy.act(reading);
        let reward = self.rewards.reward(self.channel, reading, action);
        self.policy.learn(reading, action, reward, reading);
        let alert = self.debouncer.evaluate(reading);

        if action == Action::Alert {
            self.alert_count += 1;
        }

        tracing::debug!(
            channel = %self.channel,
            reading,
            action = %action,
            reward,
            epsilon = self.policy.epsilon(),
            "Channel decision"
        );

        ChannelDecision {
            channel: self.channel,
            reading,
            action,
            reward,
            alert,
        }
    }

    /// Channel this monitor owns.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Number of ticks on which the policy chose [`Action::Alert`].
    #[must_use]
    pub const fn alert_count(&self) -> u64 {
        self.alert_count
    }

    /// Current debounce state.
    #[must_use]
    pub const fn alert_state(&self) -> AlertState {
        self.debouncer.state()
    }

    /// The channel's policy.
    #[must_use]
    pub const fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Mutable access to the channel's policy.
    pub fn policy_mut(&mut self) -> &mut DecisionPolicy {
        &mut self.policy
    }
}

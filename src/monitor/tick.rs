//! The per-sample orchestrator.

use std::sync::Arc;

use serde::Serialize;

use super::channel::{ChannelDecision, ChannelMonitor};
use crate::alerts::{AlertEvent, AlertState};
use crate::learning::{DecisionPolicy, PolicyParams, RewardModel};
use crate::sensors::{Channel, ChannelBands, ChannelMap, Sample};

/// Aggregated output of one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickResult {
    /// One-based tick number since start.
    pub tick: u64,
    /// The sample that was processed.
    pub sample: Sample,
    /// One decision per channel, in [`Channel::ALL`] order.
    pub decisions: Vec<ChannelDecision>,
    /// Alert events raised this tick.
    pub alerts: Vec<AlertEvent>,
    /// Alert-action counters after this tick.
    pub alert_counts: ChannelMap<u64>,
}

impl TickResult {
    /// Decision for `channel`.
    #[must_use]
    pub fn decision(&self, channel: Channel) -> Option<&ChannelDecision> {
        self.decisions.iter().find(|d| d.channel == channel)
    }
}

/// Drives every channel monitor for each arriving sample.
#[derive(Debug, Clone)]
pub struct MonitoringLoop {
    monitors: ChannelMap<ChannelMonitor>,
    ticks: u64,
}

impl MonitoringLoop {
    /// Build monitors for every channel.
    ///
    /// With a `seed`, each channel's exploration stream is derived from it
    /// and runs are reproducible. Without one, streams come from OS entropy.
    #[must_use]
    pub fn new(bands: ChannelBands, params: PolicyParams, seed: Option<u64>) -> Self {
        let rewards = Arc::new(RewardModel::new(bands));
        let monitors = ChannelMap::from_fn(|channel| {
            let policy = seed.map_or_else(
                || DecisionPolicy::from_entropy(params),
                |seed| DecisionPolicy::seeded(params, channel_seed(seed, channel)),
            );
            ChannelMonitor::new(channel, policy, Arc::clone(&rewards))
        });
        Self { monitors, ticks: 0 }
    }

    /// Process one validated sample.
    pub fn tick(&mut self, sample: &Sample) -> TickResult {
        self.ticks += 1;

        let decisions: Vec<ChannelDecision> = self
            .monitors
            .iter_mut()
            .map(|(channel, monitor)| monitor.process(sample.reading(channel)))
            .collect();
        let alerts = decisions.iter().filter_map(|d| d.alert).collect();

        TickResult {
            tick: self.ticks,
            sample: *sample,
            decisions,
            alerts,
            alert_counts: self.alert_counts(),
        }
    }

    /// Number of ticks processed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Snapshot of every channel's alert-action counter.
    #[must_use]
    pub fn alert_counts(&self) -> ChannelMap<u64> {
        self.monitors.map(|_, monitor| monitor.alert_count())
    }

    /// Snapshot of every channel's debounce state.
    #[must_use]
    pub fn alert_states(&self) -> ChannelMap<AlertState> {
        self.monitors.map(|_, monitor| monitor.alert_state())
    }

    /// The monitor for `channel`.
    #[must_use]
    pub fn monitor(&self, channel: Channel) -> &ChannelMonitor {
        &self.monitors[channel]
    }

    /// Mutable access to the monitor for `channel`.
    pub fn monitor_mut(&mut self, channel: Channel) -> &mut ChannelMonitor {
        &mut self.monitors[channel]
    }

    /// Override every channel's exploration rate.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        for (_, monitor) in self.monitors.iter_mut() {
            monitor.policy_mut().set_epsilon(epsilon);
        }
    }
}

fn channel_seed(seed: u64, channel: Channel) -> u64 {
    seed.wrapping_add(channel.index() as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::learning::Action;
    use crate::sensors::Band;
    use pretty_assertions::assert_eq;

    fn exploiting_loop() -> MonitoringLoop {
        let mut core = MonitoringLoop::new(ChannelBands::default(), PolicyParams::default(), Some(7));
        core.set_epsilon(0.0);
        core
    }

    #[test]
    fn test_tick_visits_channels_in_order() {
        let mut core = exploiting_loop();
        let result = core.tick(&Sample::new(50.0, 20.0, 50.0, 500.0));
        let channels: Vec<Channel> = result.decisions.iter().map(|d| d.channel).collect();
        assert_eq!(channels, Channel::ALL.to_vec());
        assert_eq!(result.tick, 1);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_soil_only_alert() {
        let mut core = exploiting_loop();
        let result = core.tick(&Sample::new(25.0, 22.0, 50.0, 500.0));
        assert_eq!(
            result.alerts,
            vec![AlertEvent {
                channel: Channel::Soil,
                value: 25.0,
                band: Band::new(30.0, 80.0),
            }]
        );
        assert_eq!(core.alert_states()[Channel::Soil], AlertState::Alerting);
        assert_eq!(core.alert_states()[Channel::Light], AlertState::Normal);
    }

    #[test]
    fn test_exploitation_on_fresh_states_never_counts_alerts() {
        let mut core = exploiting_loop();
        let result = core.tick(&Sample::new(25.0, 22.0, 50.0, 500.0));
        assert!(result.decisions.iter().all(|d| d.action == Action::Wait));
        assert_eq!(result.alert_counts[Channel::Soil], 0);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut a = exploiting_loop();
        let mut b = exploiting_loop();
        a.tick(&Sample::new(25.0, 22.0, 50.0, 500.0));
        b.tick(&Sample::new(25.0, 99.0, 0.0, 0.0));
        assert_eq!(
            a.monitor(Channel::Soil).policy().values(25.0),
            b.monitor(Channel::Soil).policy().values(25.0)
        );
    }

    #[test]
    fn test_seeded_loops_are_reproducible() {
        let mut a = MonitoringLoop::new(ChannelBands::default(), PolicyParams::default(), Some(3));
        let mut b = MonitoringLoop::new(ChannelBands::default(), PolicyParams::default(), Some(3));
        for i in 0..100 {
            let sample = Sample::new(f64::from(i), 20.0, 50.0, f64::from(i * 10));
            assert_eq!(a.tick(&sample), b.tick(&sample));
        }
        assert_eq!(a.ticks(), 100);
    }

    #[test]
    fn test_tick_result_serializes() {
        let mut core = exploiting_loop();
        let result = core.tick(&Sample::new(25.0, 22.0, 50.0, 500.0));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["tick"], 1);
        assert_eq!(json["decisions"][0]["action"], "Wait");
        assert_eq!(json["alerts"][0]["channel"], "soil");
        assert_eq!(json["alert_counts"]["soil"], 0);
    }
}

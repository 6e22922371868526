//! Online decision learning.
//!
//! This module provides:
//! - [`RewardModel`]: scores an action against a channel's operating band
//! - [`DecisionPolicy`]: per-channel epsilon-greedy tabular Q-learning
//! - [`Action`] and [`StateKey`]: the action space and discretized state
//!
//! # Example
//!
//! ```
//! use agri_sentinel::learning::{Action, DecisionPolicy, PolicyParams, RewardModel};
//! use agri_sentinel::sensors::Channel;
//!
//! let rewards = RewardModel::default();
//! let mut policy = DecisionPolicy::seeded(PolicyParams::default(), 42);
//!
//! let reading = 25.0;
//! let action = policy.act(reading);
//! let reward = rewards.reward(Channel::Soil, reading, action);
//! policy.learn(reading, action, reward, reading);
//!
//! assert!(policy.epsilon() < 1.0);
//! assert!(Action::ALL.contains(&action));
//! ```

mod policy;
mod reward;
mod types;

pub use policy::{
    ActionValues, DecisionPolicy, PolicyParams, ValueTable, DEFAULT_ALPHA, DEFAULT_EPSILON_DECAY,
    DEFAULT_EPSILON_MIN, DEFAULT_EPSILON_START, DEFAULT_GAMMA,
};
pub use reward::{
    RewardModel, REWARD_IN_BAND_ACT, REWARD_IN_BAND_WAIT, REWARD_OUT_OF_BAND_ACT,
    REWARD_OUT_OF_BAND_WAIT,
};
pub use types::{Action, StateKey};

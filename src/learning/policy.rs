//! Tabular Q-learning policy, one instance per channel.
//!
//! The policy discretizes a reading into a [`StateKey`], picks an action
//! epsilon-greedily, and applies a one-step bootstrapped update from the
//! observed reward. Exploration decays multiplicatively after every update
//! down to a floor.
//!
//! The monitor passes the same reading as both current and next state, so
//! an update pulls the state's value toward `reward + gamma * max(Q[s])`.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::types::{Action, StateKey};

/// Default learning rate.
pub const DEFAULT_ALPHA: f64 = 0.1;
/// Default discount factor.
pub const DEFAULT_GAMMA: f64 = 0.9;
/// Default starting exploration rate.
pub const DEFAULT_EPSILON_START: f64 = 1.0;
/// Default multiplicative exploration decay per update.
pub const DEFAULT_EPSILON_DECAY: f64 = 0.995;
/// Default exploration floor.
pub const DEFAULT_EPSILON_MIN: f64 = 0.01;

/// Action values for one state, indexed by [`Action::index`].
pub type ActionValues = [f64; Action::COUNT];

/// Learning hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyParams {
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Exploration rate before any update.
    pub epsilon_start: f64,
    /// Multiplicative decay applied after each update.
    pub epsilon_decay: f64,
    /// Exploration floor.
    pub epsilon_min: f64,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            gamma: DEFAULT_GAMMA,
            epsilon_start: DEFAULT_EPSILON_START,
            epsilon_decay: DEFAULT_EPSILON_DECAY,
            epsilon_min: DEFAULT_EPSILON_MIN,
        }
    }
}

/// Lazily populated map from state to action values.
///
/// Unseen states start at the zero vector. Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    entries: HashMap<StateKey, ActionValues>,
}

impl ValueTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `key`, inserting zeros on first visit.
    pub fn entry(&mut self, key: StateKey) -> &mut ActionValues {
        self.entries.entry(key).or_insert([0.0; Action::COUNT])
    }

    /// Values for `key` if it has been visited.
    #[must_use]
    pub fn get(&self, key: &StateKey) -> Option<&ActionValues> {
        self.entries.get(key)
    }

    /// Number of visited states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no state has been visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index of the largest value; ties go to the lowest index.
fn greedy(values: &ActionValues) -> Action {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    Action::from_index(best).unwrap_or(Action::Wait)
}

fn max_value(values: &ActionValues) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Epsilon-greedy tabular Q-learning agent for a single channel.
#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    params: PolicyParams,
    table: ValueTable,
    epsilon: f64,
    rng: ChaCha8Rng,
}

impl DecisionPolicy {
    /// Create a policy with a reproducible exploration stream.
    #[must_use]
    pub fn seeded(params: PolicyParams, seed: u64) -> Self {
        Self::with_rng(params, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create a policy seeded from OS entropy.
    #[must_use]
    pub fn from_entropy(params: PolicyParams) -> Self {
        Self::with_rng(params, ChaCha8Rng::from_entropy())
    }

    fn with_rng(params: PolicyParams, rng: ChaCha8Rng) -> Self {
        Self {
            params,
            table: ValueTable::new(),
            epsilon: params.epsilon_start,
            rng,
        }
    }

    /// Hyperparameters in use.
    #[must_use]
    pub const fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// Current exploration rate.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate, clamped to `[0, 1]`.
    ///
    /// Setting zero forces pure exploitation; decay never raises it again.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// The learned value table.
    #[must_use]
    pub const fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Number of distinct states seen so far.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Learned values for the state `reading` discretizes to.
    #[must_use]
    pub fn values(&self, reading: f64) -> Option<&ActionValues> {
        self.table.get(&StateKey::from_reading(reading))
    }

    /// Choose an action for `reading`.
    pub fn act(&mut self, reading: f64) -> Action {
        let key = StateKey::from_reading(reading);
        let values = *self.table.entry(key);

        if self.rng.gen::<f64>() < self.epsilon {
            let index = self.rng.gen_range(0..Action::COUNT);
            return Action::from_index(index).unwrap_or(Action::Wait);
        }
        greedy(&values)
    }

    /// Apply a one-step update for `action` taken at `reading`, then decay
    /// exploration.
    pub fn learn(&mut self, reading: f64, action: Action, reward: f64, next_reading: f64) {
        let key = StateKey::from_reading(reading);
        let next_key = StateKey::from_reading(next_reading);
        self.table.entry(key);
        let next_best = max_value(self.table.entry(next_key));

        let target = reward + self.params.gamma * next_best;
        let slot = &mut self.table.entry(key)[action.index()];
        *slot += self.params.alpha * (target - *slot);

        if self.epsilon > self.params.epsilon_min {
            self.epsilon = (self.epsilon * self.params.epsilon_decay).max(self.params.epsilon_min);
        }
    }
}

//! Action and state types shared by the policy and reward model.

use std::fmt;

use serde::Serialize;

/// Decision taken for one channel on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    /// Take no action.
    Wait,
    /// Trigger the channel's actuator.
    Actuate,
    /// Raise an operator alert.
    Alert,
}

impl Action {
    /// Size of the action space.
    pub const COUNT: usize = 3;

    /// All actions, ordered by index.
    pub const ALL: [Self; Self::COUNT] = [Self::Wait, Self::Actuate, Self::Alert];

    /// Index of this action in the value vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Wait => 0,
            Self::Actuate => 1,
            Self::Alert => 2,
        }
    }

    /// Action for a value-vector index, if in range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Wait),
            1 => Some(Self::Actuate),
            2 => Some(Self::Alert),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wait => "Wait",
            Self::Actuate => "Actuate",
            Self::Alert => "Alert",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discretized reading used as a value-table key.
///
/// Holds the reading rounded to two decimal places, stored as an integer
/// count of hundredths. Halfway cases round to even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateKey(i64);

impl StateKey {
    /// Decimal places kept by discretization.
    pub const PRECISION: i32 = 2;

    /// Discretize a reading.
    ///
    /// Non-finite readings never reach the core; if one does, NaN maps to
    /// zero and infinities saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_reading(reading: f64) -> Self {
        let scale = 10f64.powi(Self::PRECISION);
        Self((reading * scale).round_ties_even() as i64)
    }

    /// The rounded reading this key represents.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self) -> f64 {
        self.0 as f64 / 10f64.powi(Self::PRECISION)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

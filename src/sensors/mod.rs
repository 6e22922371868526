//! Sensor channels, operating bands and multi-channel samples.
//!
//! This module provides:
//! - [`Channel`]: the closed set of monitored quantities
//! - [`Band`]: an inclusive `[low, high]` operating range
//! - [`ChannelMap`]: a fixed-size map with one slot per channel
//! - [`Sample`]: one reading per channel, produced atomically per tick
//!
//! # Example
//!
//! ```
//! use agri_sentinel::sensors::{Band, Channel, ChannelBands, Sample};
//!
//! let bands = ChannelBands::default();
//! assert_eq!(bands[Channel::Soil], Band::new(30.0, 80.0));
//!
//! let sample = Sample::new(25.0, 22.0, 50.0, 500.0);
//! assert!(!bands[Channel::Soil].contains(sample.reading(Channel::Soil)));
//! assert!(bands[Channel::Light].contains(sample.reading(Channel::Light)));
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A monitored physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Soil moisture (%).
    Soil,
    /// Air temperature (°C).
    Temperature,
    /// Relative humidity (%).
    Humidity,
    /// Light level (raw sensor units).
    Light,
}

impl Channel {
    /// Number of channels in the closed set.
    pub const COUNT: usize = 4;

    /// All channels in the fixed processing order.
    ///
    /// This is also the field order of a sensor line.
    pub const ALL: [Self; Self::COUNT] = [Self::Soil, Self::Temperature, Self::Humidity, Self::Light];

    /// Position of this channel in [`Channel::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Soil => 0,
            Self::Temperature => 1,
            Self::Humidity => 2,
            Self::Light => 3,
        }
    }

    /// Lowercase channel name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soil => "soil",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive operating range for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    /// Lowest in-range value.
    pub low: f64,
    /// Highest in-range value.
    pub high: f64,
}

impl Band {
    /// Create a band. Callers validate `low <= high` (see [`crate::config`]).
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Returns true if `value` lies within `[low, high]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.low, self.high)
    }
}

/// One value of `T` per channel, indexed by [`Channel`].
///
/// Serializes as a map keyed by channel name in [`Channel::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap<T>([T; Channel::COUNT]);

impl<T> ChannelMap<T> {
    /// Build a map by evaluating `f` for every channel in order.
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self(Channel::ALL.map(&mut f))
    }

    /// Iterate `(channel, value)` pairs in [`Channel::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate `(channel, value)` pairs mutably in [`Channel::ALL`] order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Channel, &mut T)> {
        Channel::ALL.into_iter().zip(self.0.iter_mut())
    }

    /// Transform every value, keeping the channel association.
    pub fn map<U>(&self, mut f: impl FnMut(Channel, &T) -> U) -> ChannelMap<U> {
        ChannelMap::from_fn(|channel| f(channel, &self.0[channel.index()]))
    }
}

impl<T> Index<Channel> for ChannelMap<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.0[channel.index()]
    }
}

impl<T> IndexMut<Channel> for ChannelMap<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.0[channel.index()]
    }
}

impl<T: Serialize> Serialize for ChannelMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Channel::COUNT))?;
        for (channel, value) in self.iter() {
            map.serialize_entry(channel.name(), value)?;
        }
        map.end()
    }
}

/// Operating bands for every channel.
pub type ChannelBands = ChannelMap<Band>;

/// Default soil moisture band.
pub const DEFAULT_SOIL_BAND: Band = Band::new(30.0, 80.0);
/// Default temperature band.
pub const DEFAULT_TEMPERATURE_BAND: Band = Band::new(15.0, 40.0);
/// Default humidity band.
pub const DEFAULT_HUMIDITY_BAND: Band = Band::new(30.0, 80.0);
/// Default light band.
pub const DEFAULT_LIGHT_BAND: Band = Band::new(300.0, 900.0);

impl Default for ChannelBands {
    fn default() -> Self {
        Self([
            DEFAULT_SOIL_BAND,
            DEFAULT_TEMPERATURE_BAND,
            DEFAULT_HUMIDITY_BAND,
            DEFAULT_LIGHT_BAND,
        ])
    }
}

/// One reading per channel at a single sample instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Soil moisture reading.
    pub soil: f64,
    /// Temperature reading.
    pub temperature: f64,
    /// Humidity reading.
    pub humidity: f64,
    /// Light reading.
    pub light: f64,
}

impl Sample {
    /// Create a sample from readings in [`Channel::ALL`] order.
    #[must_use]
    pub const fn new(soil: f64, temperature: f64, humidity: f64, light: f64) -> Self {
        Self {
            soil,
            temperature,
            humidity,
            light,
        }
    }

    /// The reading for `channel`.
    #[must_use]
    pub const fn reading(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Soil => self.soil,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Light => self.light,
        }
    }

    /// Iterate `(channel, reading)` pairs in [`Channel::ALL`] order.
    pub fn readings(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        Channel::ALL.into_iter().map(|channel| (channel, self.reading(channel)))
    }
}

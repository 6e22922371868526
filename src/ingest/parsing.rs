//! Sensor line parsing.
//!
//! The device prints one comma-separated line per sample:
//! `soil,temperature,humidity,light`. Soil may carry a trailing `V` unit
//! suffix.

use crate::error::IngestError;
use crate::sensors::{Channel, Sample};

/// Unit suffix the soil probe appends to its reading.
const SOIL_UNIT_SUFFIX: char = 'V';

/// Parse one line from the sensor device.
///
/// Returns `Ok(None)` for lines that carry no sample at all (blank lines
/// and boot chatter without a comma).
///
/// # Errors
///
/// Returns [`IngestError::WrongFieldCount`] if the line does not hold
/// exactly one field per channel, [`IngestError::NonNumeric`] for a field
/// that is not a number and [`IngestError::NonFinite`] for NaN or
/// infinity.
pub fn parse_sample_line(line: &str) -> Result<Option<Sample>, IngestError> {
    let line = line.trim();
    if line.is_empty() || !line.contains(',') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != Channel::COUNT {
        return Err(IngestError::WrongFieldCount {
            expected: Channel::COUNT,
            found: fields.len(),
        });
    }

    let mut values = [0.0; Channel::COUNT];
    for (channel, raw) in Channel::ALL.into_iter().zip(fields) {
        let raw = raw.trim();
        let text = if channel == Channel::Soil {
            raw.trim_end_matches(SOIL_UNIT_SUFFIX)
        } else {
            raw
        };
        let value: f64 = text.parse().map_err(|_| IngestError::NonNumeric {
            field: channel.name().to_string(),
            value: raw.to_string(),
        })?;
        if !value.is_finite() {
            return Err(IngestError::NonFinite {
                field: channel.name().to_string(),
            });
        }
        values[channel.index()] = value;
    }

    let [soil, temperature, humidity, light] = values;
    Ok(Some(Sample::new(soil, temperature, humidity, light)))
}

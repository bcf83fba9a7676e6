//! Measurement — an immutable timestamped sensor reading.
//!
//! Measurements are never part of the in-memory house graph; they live in
//! storage keyed by device id and timestamp and are queried per request.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format for measurement timestamps. Sortable ISO-8601, so
/// lexicographic string ordering equals temporal ordering.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unit strings as stored in the `measurements` table. The aggregate queries
/// filter on exact matches, so these must not drift.
pub mod units {
    /// Degrees Celsius, produced by temperature sensors and heat pumps.
    pub const TEMPERATURE: &str = "°C";
    /// Relative humidity percentage.
    pub const HUMIDITY: &str = "%";
}

/// A single timestamped sensor reading.
///
/// Timestamps are assumed unique per device; duplicate timestamps are
/// accepted on insert but make delete-by-timestamp ambiguous, which is the
/// caller's responsibility to avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// ISO-8601 timestamp (see [`TIMESTAMP_FORMAT`]).
    pub timestamp: String,
    /// The measured value.
    pub value: f64,
    /// Unit string, e.g. [`units::TEMPERATURE`] or [`units::HUMIDITY`].
    pub unit: String,
}

impl Measurement {
    /// Create a measurement from an already formatted timestamp.
    #[must_use]
    pub fn new(timestamp: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            unit: unit.into(),
        }
    }

    /// Create a measurement taken at the given instant.
    #[must_use]
    pub fn at(instant: NaiveDateTime, value: f64, unit: impl Into<String>) -> Self {
        Self::new(instant.format(TIMESTAMP_FORMAT).to_string(), value, unit)
    }
}

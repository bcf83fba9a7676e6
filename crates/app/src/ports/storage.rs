//! Storage ports — repository traits for persistence.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;

use smarthouse_domain::device::Device;
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::house::House;
use smarthouse_domain::id::{DeviceId, RoomId};
use smarthouse_domain::measurement::Measurement;

/// Reconstructs the house graph and persists actuator state transitions.
pub trait HouseRepository {
    /// Deep-load the complete house graph from storage.
    ///
    /// This is a one-shot, all-or-nothing reconstruction: a device
    /// referencing an unknown room or a malformed row is an error, never a
    /// partial graph.
    fn load_house(&self) -> impl Future<Output = Result<House, SmartHouseError>> + Send;

    /// Write the device's current actuator state to storage.
    ///
    /// Idempotent. A no-op (not an error) for devices without actuator
    /// capability.
    fn save_actuator_state(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<(), SmartHouseError>> + Send;
}

/// The sensor time series, keyed by device id. Never consults the in-memory
/// graph; identity and capability checks belong to the caller.
pub trait MeasurementRepository {
    /// Append a reading. Duplicate timestamps are accepted silently.
    fn insert(
        &self,
        device: &DeviceId,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send;

    /// The reading with the greatest timestamp, or `None` for an empty
    /// series.
    fn latest(
        &self,
        device: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send;

    /// Readings newest-first; `limit` caps the count when present.
    fn readings(
        &self,
        device: &DeviceId,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHouseError>> + Send;

    /// Atomically remove and return the reading with the smallest
    /// timestamp, or `None` for an empty series.
    fn delete_oldest(
        &self,
        device: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send;

    /// Average temperature per calendar date over all temperature readings
    /// from devices in the room, restricted to the inclusive
    /// `[from 00:00:00, until 23:59:59]` window when bounds are given.
    fn avg_temperatures_in_room(
        &self,
        room: RoomId,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> impl Future<Output = Result<BTreeMap<NaiveDate, f64>, SmartHouseError>> + Send;

    /// Ascending hours of the given date during which more than three
    /// humidity readings in the room exceeded the room's day-wide average
    /// humidity.
    fn hours_with_humidity_above(
        &self,
        room: RoomId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<u32>, SmartHouseError>> + Send;
}

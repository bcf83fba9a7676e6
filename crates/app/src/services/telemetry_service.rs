//! Telemetry service — measurement queries and room statistics.
//!
//! A thin use-case layer over the measurement port. Capability checks
//! (does this device exist, is it a sensor) belong to the house service;
//! here everything is keyed by device id or room, and empty series are
//! normal outcomes, not errors.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::house::Room;
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::measurement::Measurement;

use crate::ports::MeasurementRepository;

/// Application service for the sensor time series.
pub struct TelemetryService<M> {
    repo: M,
}

impl<M: MeasurementRepository> TelemetryService<M> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: M) -> Self {
        Self { repo }
    }

    /// Append a reading for the device.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, measurement), fields(device = %device))]
    pub async fn record(
        &self,
        device: &DeviceId,
        measurement: Measurement,
    ) -> Result<Measurement, SmartHouseError> {
        self.repo.insert(device, measurement).await
    }

    /// The most recent reading, or `None` for an empty series.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn latest(&self, device: &DeviceId) -> Result<Option<Measurement>, SmartHouseError> {
        self.repo.latest(device).await
    }

    /// Readings newest-first, optionally capped.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn history(
        &self,
        device: &DeviceId,
        limit: Option<usize>,
    ) -> Result<Vec<Measurement>, SmartHouseError> {
        self.repo.readings(device, limit).await
    }

    /// Remove and return the oldest reading, or `None` for an empty series.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self), fields(device = %device))]
    pub async fn drop_oldest(
        &self,
        device: &DeviceId,
    ) -> Result<Option<Measurement>, SmartHouseError> {
        self.repo.delete_oldest(device).await
    }

    /// Average temperature per calendar date for the room. A room without
    /// a persisted id has no stored readings, so the result is empty.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn daily_temperature_averages(
        &self,
        room: &Room,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<BTreeMap<NaiveDate, f64>, SmartHouseError> {
        let Some(id) = room.id else {
            return Ok(BTreeMap::new());
        };
        self.repo.avg_temperatures_in_room(id, from, until).await
    }

    /// Hours of the given date with more than three humidity readings
    /// above the room's day-wide average. Empty for unpersisted rooms.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn humid_hours_above_average(
        &self,
        room: &Room,
        date: NaiveDate,
    ) -> Result<Vec<u32>, SmartHouseError> {
        let Some(id) = room.id else {
            return Ok(Vec::new());
        };
        self.repo.hours_with_humidity_above(id, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use smarthouse_domain::id::RoomId;
    use smarthouse_domain::measurement::units;

    /// In-memory time series ordered by timestamp string.
    #[derive(Default)]
    struct InMemoryMeasurementRepo {
        rows: Mutex<Vec<(DeviceId, Measurement)>>,
    }

    impl MeasurementRepository for InMemoryMeasurementRepo {
        fn insert(
            &self,
            device: &DeviceId,
            measurement: Measurement,
        ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send {
            let mut rows = self.rows.lock().unwrap();
            rows.push((device.clone(), measurement.clone()));
            async { Ok(measurement) }
        }

        fn latest(
            &self,
            device: &DeviceId,
        ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
            let rows = self.rows.lock().unwrap();
            let result = rows
                .iter()
                .filter(|(id, _)| id == device)
                .max_by(|(_, a), (_, b)| a.timestamp.cmp(&b.timestamp))
                .map(|(_, m)| m.clone());
            async { Ok(result) }
        }

        fn readings(
            &self,
            device: &DeviceId,
            limit: Option<usize>,
        ) -> impl Future<Output = Result<Vec<Measurement>, SmartHouseError>> + Send {
            let rows = self.rows.lock().unwrap();
            let mut result: Vec<Measurement> = rows
                .iter()
                .filter(|(id, _)| id == device)
                .map(|(_, m)| m.clone())
                .collect();
            result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            if let Some(limit) = limit {
                result.truncate(limit);
            }
            async { Ok(result) }
        }

        fn delete_oldest(
            &self,
            device: &DeviceId,
        ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
            let mut rows = self.rows.lock().unwrap();
            let oldest = rows
                .iter()
                .enumerate()
                .filter(|(_, (id, _))| id == device)
                .min_by(|(_, (_, a)), (_, (_, b))| a.timestamp.cmp(&b.timestamp))
                .map(|(index, _)| index);
            let result = oldest.map(|index| rows.remove(index).1);
            async { Ok(result) }
        }

        fn avg_temperatures_in_room(
            &self,
            _room: RoomId,
            _from: Option<NaiveDate>,
            _until: Option<NaiveDate>,
        ) -> impl Future<Output = Result<BTreeMap<NaiveDate, f64>, SmartHouseError>> + Send
        {
            let mut result = BTreeMap::new();
            result.insert(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 21.0);
            async { Ok(result) }
        }

        fn hours_with_humidity_above(
            &self,
            _room: RoomId,
            _date: NaiveDate,
        ) -> impl Future<Output = Result<Vec<u32>, SmartHouseError>> + Send {
            async { Ok(vec![10, 14]) }
        }
    }

    fn service() -> TelemetryService<InMemoryMeasurementRepo> {
        TelemetryService::new(InMemoryMeasurementRepo::default())
    }

    fn persisted_room() -> Room {
        Room::persisted(RoomId::new(1), 1, 15.0, None)
    }

    #[tokio::test]
    async fn should_return_latest_reading_after_out_of_order_inserts() {
        let service = service();
        let device = DeviceId::from("temp-1");

        service
            .record(
                &device,
                Measurement::new("2024-01-02 10:00:00", 21.0, units::TEMPERATURE),
            )
            .await
            .unwrap();
        // Inserting an older reading must not change the latest one.
        service
            .record(
                &device,
                Measurement::new("2024-01-01 10:00:00", 19.0, units::TEMPERATURE),
            )
            .await
            .unwrap();

        let latest = service.latest(&device).await.unwrap().unwrap();
        assert_eq!(latest.timestamp, "2024-01-02 10:00:00");
    }

    #[tokio::test]
    async fn should_return_none_for_empty_series() {
        let service = service();
        let device = DeviceId::from("temp-1");
        assert_eq!(service.latest(&device).await.unwrap(), None);
        assert_eq!(service.drop_oldest(&device).await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_drop_oldest_readings_in_order() {
        let service = service();
        let device = DeviceId::from("temp-1");
        for (ts, value) in [
            ("2024-01-01 08:00:00", 18.0),
            ("2024-01-01 09:00:00", 19.0),
            ("2024-01-01 10:00:00", 20.0),
        ] {
            service
                .record(&device, Measurement::new(ts, value, units::TEMPERATURE))
                .await
                .unwrap();
        }

        let first = service.drop_oldest(&device).await.unwrap().unwrap();
        assert_eq!(first.timestamp, "2024-01-01 08:00:00");
        let second = service.drop_oldest(&device).await.unwrap().unwrap();
        assert_eq!(second.timestamp, "2024-01-01 09:00:00");
    }

    #[tokio::test]
    async fn should_cap_history_to_newest_readings() {
        let service = service();
        let device = DeviceId::from("temp-1");
        for hour in 6..11 {
            service
                .record(
                    &device,
                    Measurement::new(
                        format!("2024-01-01 {hour:02}:00:00"),
                        20.0,
                        units::TEMPERATURE,
                    ),
                )
                .await
                .unwrap();
        }

        let history = service.history(&device, Some(2)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp, "2024-01-01 10:00:00");
        assert_eq!(history[1].timestamp, "2024-01-01 09:00:00");
    }

    #[tokio::test]
    async fn should_skip_aggregates_for_unpersisted_room() {
        let service = service();
        let room = Room::new(1, 15.0, None);

        let averages = service
            .daily_temperature_averages(&room, None, None)
            .await
            .unwrap();
        assert!(averages.is_empty());

        let hours = service
            .humid_hours_above_average(&room, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        assert!(hours.is_empty());
    }

    #[tokio::test]
    async fn should_delegate_aggregates_for_persisted_room() {
        let service = service();
        let room = persisted_room();

        let averages = service
            .daily_temperature_averages(&room, None, None)
            .await
            .unwrap();
        assert_eq!(averages.len(), 1);

        let hours = service
            .humid_hours_above_average(&room, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(hours, vec![10, 14]);
    }
}

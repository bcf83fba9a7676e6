//! `SQLite` implementation of [`MeasurementRepository`].
//!
//! Timestamps are sortable ISO-8601 strings, so `ORDER BY ts` is temporal
//! order. The aggregate queries bucket in SQL via `STRFTIME` and join on
//! room membership, which picks up dedicated sensors and sensor-capable
//! actuators alike.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, SqlitePool};

use smarthouse_app::ports::MeasurementRepository;
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::{DeviceId, RoomId};
use smarthouse_domain::measurement::{Measurement, units};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Measurement`].
struct Wrapper(Measurement);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let timestamp: String = row.try_get("ts")?;
        let value: f64 = row.try_get("value")?;
        let unit: String = row.try_get("unit")?;
        Ok(Self(Measurement {
            timestamp,
            value,
            unit,
        }))
    }
}

const INSERT: &str = "INSERT INTO measurements (device, ts, value, unit) VALUES (?, ?, ?, ?)";

const SELECT_LATEST: &str = r"
    SELECT ts, value, unit FROM measurements
    WHERE device = ?
    ORDER BY ts DESC
    LIMIT 1
";

const SELECT_DESC: &str = r"
    SELECT ts, value, unit FROM measurements
    WHERE device = ?
    ORDER BY ts DESC
";

const SELECT_DESC_LIMIT: &str = r"
    SELECT ts, value, unit FROM measurements
    WHERE device = ?
    ORDER BY ts DESC
    LIMIT ?
";

const SELECT_OLDEST: &str = r"
    SELECT ts, value, unit FROM measurements
    WHERE device = ?
    ORDER BY ts ASC
    LIMIT 1
";

const DELETE_BY_TS: &str = "DELETE FROM measurements WHERE device = ? AND ts = ?";

const HUMID_HOURS: &str = r"
    SELECT CAST(STRFTIME('%H', DATETIME(m.ts)) AS INTEGER) AS hour
    FROM measurements m
    INNER JOIN devices d ON m.device = d.id
    WHERE d.room = ? AND m.unit = ? AND DATE(m.ts) = DATE(?)
      AND m.value > (
        SELECT AVG(m2.value)
        FROM measurements m2
        INNER JOIN devices d2 ON d2.id = m2.device
        WHERE d2.room = ? AND m2.unit = ? AND DATE(m2.ts) = DATE(?)
      )
    GROUP BY hour
    HAVING COUNT(m.value) > 3
    ORDER BY hour
";

/// `SQLite`-backed measurement repository.
pub struct SqliteMeasurementRepository {
    pool: SqlitePool,
}

impl SqliteMeasurementRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MeasurementRepository for SqliteMeasurementRepository {
    fn insert(
        &self,
        device: &DeviceId,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        let device = device.clone();
        async move {
            sqlx::query(INSERT)
                .bind(device.as_str())
                .bind(&measurement.timestamp)
                .bind(measurement.value)
                .bind(&measurement.unit)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(measurement)
        }
    }

    fn latest(
        &self,
        device: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        let device = device.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
                .bind(device.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn readings(
        &self,
        device: &DeviceId,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        let device = device.clone();
        async move {
            let rows: Vec<Wrapper> = if let Some(limit) = limit {
                let limit = i64::try_from(limit).unwrap_or(i64::MAX);
                sqlx::query_as(SELECT_DESC_LIMIT)
                    .bind(device.as_str())
                    .bind(limit)
                    .fetch_all(&pool)
                    .await
                    .map_err(StorageError::from)?
            } else {
                sqlx::query_as(SELECT_DESC)
                    .bind(device.as_str())
                    .fetch_all(&pool)
                    .await
                    .map_err(StorageError::from)?
            };

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn delete_oldest(
        &self,
        device: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        let device = device.clone();
        async move {
            // Find-then-delete in one transaction so a concurrent insert
            // cannot slip a new oldest row between the two statements.
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let row: Option<Wrapper> = sqlx::query_as(SELECT_OLDEST)
                .bind(device.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            let Some(Wrapper(oldest)) = row else {
                return Ok(None);
            };

            sqlx::query(DELETE_BY_TS)
                .bind(device.as_str())
                .bind(&oldest.timestamp)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            tx.commit().await.map_err(StorageError::from)?;

            Ok(Some(oldest))
        }
    }

    fn avg_temperatures_in_room(
        &self,
        room: RoomId,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> impl Future<Output = Result<BTreeMap<NaiveDate, f64>, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut query = QueryBuilder::<sqlx::Sqlite>::new(
                "SELECT STRFTIME('%Y-%m-%d', DATETIME(m.ts)) AS day, AVG(m.value) AS avg_value \
                 FROM devices d \
                 INNER JOIN measurements m ON m.device = d.id \
                 WHERE d.room = ",
            );
            query.push_bind(room.value());
            query.push(" AND m.unit = ");
            query.push_bind(units::TEMPERATURE);
            if let Some(from) = from {
                query.push(" AND m.ts >= ");
                query.push_bind(format!("{from} 00:00:00"));
            }
            if let Some(until) = until {
                query.push(" AND m.ts <= ");
                query.push_bind(format!("{until} 23:59:59"));
            }
            query.push(" GROUP BY day ORDER BY day");

            let rows: Vec<(String, f64)> = query
                .build_query_as()
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut result = BTreeMap::new();
            for (day, avg) in rows {
                let date =
                    NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(StorageError::from)?;
                result.insert(date, avg);
            }
            Ok(result)
        }
    }

    fn hours_with_humidity_above(
        &self,
        room: RoomId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<u32>, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let date = date.to_string();
            let hours: Vec<u32> = sqlx::query_scalar(HUMID_HOURS)
                .bind(room.value())
                .bind(units::HUMIDITY)
                .bind(&date)
                .bind(room.value())
                .bind(units::HUMIDITY)
                .bind(&date)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(hours)
        }
    }
}

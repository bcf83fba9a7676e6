//! `SQLite` implementation of [`HouseRepository`].
//!
//! The deep load is one-shot and all-or-nothing: floors are derived from
//! the maximum floor level referenced by any room, rooms resolve their
//! floor by level, devices resolve their room by storage id, and any
//! malformed or inconsistent row aborts the whole reconstruction.

use std::collections::HashMap;
use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthouse_app::ports::HouseRepository;
use smarthouse_domain::device::{ActuatorState, Device, DeviceVariant};
use smarthouse_domain::error::{SmartHouseError, ValidationError};
use smarthouse_domain::house::{House, Room};
use smarthouse_domain::id::RoomId;

use crate::error::StorageError;

/// Device kind that marks an actuator as also carrying a sensor.
const HEAT_PUMP_KIND: &str = "Heat Pump";

const MAX_FLOOR: &str = "SELECT MAX(floor) FROM rooms";
const SELECT_ROOMS: &str = "SELECT id, floor, area, name FROM rooms";
const SELECT_DEVICES: &str = "SELECT id, room, kind, category, supplier, product FROM devices";
const SELECT_STATES: &str = "SELECT device, state FROM states";
const UPSERT_STATE: &str = "INSERT INTO states (device, state) VALUES (?, ?) \
     ON CONFLICT (device) DO UPDATE SET state = excluded.state";

/// Wrapper for converting database rows into domain [`Room`].
struct RoomWrapper(Room);

impl<'r> FromRow<'r, SqliteRow> for RoomWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let floor: i64 = row.try_get("floor")?;
        let area: f64 = row.try_get("area")?;
        let name: Option<String> = row.try_get("name")?;

        let floor = u32::try_from(floor).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Room::persisted(RoomId::new(id), floor, area, name)))
    }
}

/// Raw device row; the capability variant needs the states table, so the
/// conversion into [`Device`] happens separately.
#[derive(FromRow)]
struct DeviceRow {
    id: String,
    room: i64,
    kind: String,
    category: String,
    supplier: String,
    product: String,
}

impl DeviceRow {
    fn into_device(self, raw_state: Option<f64>) -> Result<Device, ValidationError> {
        let variant = match self.category.as_str() {
            "sensor" => DeviceVariant::Sensor,
            "actuator" if self.kind == HEAT_PUMP_KIND => {
                DeviceVariant::ActuatorWithSensor(ActuatorState::decode(raw_state))
            }
            "actuator" => DeviceVariant::Actuator(ActuatorState::decode(raw_state)),
            other => {
                return Err(ValidationError::UnknownCategory {
                    category: other.to_string(),
                });
            }
        };
        Device::new(
            self.id,
            RoomId::new(self.room),
            self.product,
            self.supplier,
            self.kind,
            variant,
        )
    }
}

/// `SQLite`-backed house repository.
pub struct SqliteHouseRepository {
    pool: SqlitePool,
}

impl SqliteHouseRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HouseRepository for SqliteHouseRepository {
    fn load_house(&self) -> impl Future<Output = Result<House, SmartHouseError>> + Send {
        let pool = self.pool.clone();
        async move {
            // Floor count is derived purely from room data: levels 1..=max
            // are registered contiguously, so a level with no rooms still
            // yields an empty floor.
            let max_floor: Option<i64> = sqlx::query_scalar(MAX_FLOOR)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut house = House::new();
            for _ in 0..max_floor.unwrap_or(0) {
                house.add_floor();
            }

            let rooms: Vec<RoomWrapper> = sqlx::query_as(SELECT_ROOMS)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            for RoomWrapper(room) in rooms {
                house.register_room(room)?;
            }

            let states: Vec<(String, Option<f64>)> = sqlx::query_as(SELECT_STATES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            let states: HashMap<String, Option<f64>> = states.into_iter().collect();

            let devices: Vec<DeviceRow> = sqlx::query_as(SELECT_DEVICES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            for row in devices {
                // Absent row and stored NULL both decode to off.
                let raw_state = states.get(&row.id).copied().flatten();
                let device = row.into_device(raw_state)?;
                house.register_device(device)?;
            }

            Ok(house)
        }
    }

    fn save_actuator_state(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<(), SmartHouseError>> + Send {
        let pool = self.pool.clone();
        let device = device.clone();
        async move {
            // Documented no-op for devices without actuator capability.
            let Some(state) = device.actuator_state() else {
                return Ok(());
            };

            sqlx::query(UPSERT_STATE)
                .bind(device.id.as_str())
                .bind(state.encode())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

//! House service — structure queries and actuator commands.
//!
//! Loads the house graph once at startup and holds it for the process
//! lifetime. The graph is read-mostly; only actuator states mutate, and
//! those writes go through storage first, then the in-memory copy, all
//! under the write lock so concurrent commands to the same actuator
//! serialize instead of racing.

use tokio::sync::RwLock;

use smarthouse_domain::device::{ActuatorState, Device};
use smarthouse_domain::error::{NotFoundError, SmartHouseError};
use smarthouse_domain::house::{Floor, House, Room};
use smarthouse_domain::id::{DeviceId, RoomId};

use crate::ports::HouseRepository;

/// Structural totals of the house.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseSummary {
    pub floors: usize,
    pub rooms: usize,
    pub devices: usize,
    pub total_area: f64,
}

/// Application service over the in-memory house graph.
pub struct HouseService<R> {
    repo: R,
    house: RwLock<House>,
}

impl<R: HouseRepository> HouseService<R> {
    /// Deep-load the house from the repository and take ownership of it.
    ///
    /// # Errors
    ///
    /// Propagates any load failure; callers must treat this as fatal and
    /// not serve traffic with a partial graph.
    pub async fn load(repo: R) -> Result<Self, SmartHouseError> {
        let house = repo.load_house().await?;
        tracing::info!(
            floors = house.floors().len(),
            rooms = house.rooms().len(),
            devices = house.devices().len(),
            "house graph loaded"
        );
        Ok(Self {
            repo,
            house: RwLock::new(house),
        })
    }

    /// Structural totals: floor/room/device counts and total area.
    pub async fn summary(&self) -> HouseSummary {
        let house = self.house.read().await;
        HouseSummary {
            floors: house.floors().len(),
            rooms: house.rooms().len(),
            devices: house.devices().len(),
            total_area: house.total_area(),
        }
    }

    /// All floors, ordered by level.
    pub async fn floors(&self) -> Vec<Floor> {
        self.house.read().await.floors().to_vec()
    }

    /// Look up a floor by its 1-based level.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when no such floor exists.
    pub async fn floor(&self, level: u32) -> Result<Floor, SmartHouseError> {
        self.house.read().await.floor(level).cloned().ok_or_else(|| {
            NotFoundError {
                entity: "Floor",
                id: level.to_string(),
            }
            .into()
        })
    }

    /// The rooms on the given floor.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when no such floor exists.
    pub async fn rooms_on_floor(&self, level: u32) -> Result<Vec<Room>, SmartHouseError> {
        let house = self.house.read().await;
        if house.floor(level).is_none() {
            return Err(NotFoundError {
                entity: "Floor",
                id: level.to_string(),
            }
            .into());
        }
        Ok(house.rooms_on_floor(level).cloned().collect())
    }

    /// Look up a persisted room by floor level and storage id.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when the room does not exist
    /// or lies on a different floor.
    pub async fn room(&self, level: u32, id: RoomId) -> Result<Room, SmartHouseError> {
        self.house
            .read()
            .await
            .room(id)
            .filter(|room| room.floor == level)
            .cloned()
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Room",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// All devices, flat.
    pub async fn devices(&self) -> Vec<Device> {
        self.house.read().await.devices().to_vec()
    }

    /// Look up a device by its opaque id.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when no such device exists.
    pub async fn device(&self, id: &DeviceId) -> Result<Device, SmartHouseError> {
        self.house.read().await.device(id).cloned().ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up a device that has sensor capability.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when the device does not exist
    /// or cannot produce measurements.
    pub async fn sensor(&self, id: &DeviceId) -> Result<Device, SmartHouseError> {
        self.house
            .read()
            .await
            .device(id)
            .filter(|device| device.is_sensor())
            .cloned()
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Sensor",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// The current state of an actuator.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when the device does not exist
    /// or has no actuator capability.
    pub async fn actuator_state(&self, id: &DeviceId) -> Result<ActuatorState, SmartHouseError> {
        self.house
            .read()
            .await
            .device(id)
            .and_then(Device::actuator_state)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Actuator",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Apply an actuator state transition: persist it, then commit it to
    /// the in-memory graph. Holding the write lock across both steps gives
    /// the read-modify-write the device-level mutual exclusion it needs.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when the device does not exist
    /// or has no actuator capability, or a storage error from the
    /// write-through.
    #[tracing::instrument(skip(self), fields(device = %id))]
    pub async fn set_actuator_state(
        &self,
        id: &DeviceId,
        state: ActuatorState,
    ) -> Result<ActuatorState, SmartHouseError> {
        let mut house = self.house.write().await;
        let Some(device) = house.device_mut(id).filter(|device| device.is_actuator()) else {
            return Err(NotFoundError {
                entity: "Actuator",
                id: id.to_string(),
            }
            .into());
        };

        let mut updated = device.clone();
        updated.set_actuator_state(state);
        self.repo.save_actuator_state(&updated).await?;
        device.set_actuator_state(state);
        Ok(state)
    }
}

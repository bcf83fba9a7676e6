//! House — the root aggregate: floors, rooms, and devices.
//!
//! Ownership flows root → floor → room → device; floors and rooms only hold
//! non-owning id back-references for lookup. The graph is reconstructed once
//! from storage at startup and is read-mostly afterwards: only actuator
//! states mutate.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::ValidationError;
use crate::id::{DeviceId, RoomId};

/// A floor, identified by its 1-based level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// 1-based floor level.
    pub level: u32,
    /// Ids of the persisted rooms on this floor (non-owning).
    pub room_ids: Vec<RoomId>,
}

/// A room on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Storage-assigned id; `None` until the room is persisted.
    pub id: Option<RoomId>,
    /// Level of the owning floor (non-owning back-reference).
    pub floor: u32,
    /// Floor area in square meters.
    pub area: f64,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// Ids of the devices installed here (non-owning).
    pub device_ids: Vec<DeviceId>,
}

impl Room {
    /// Create a not-yet-persisted room.
    #[must_use]
    pub fn new(floor: u32, area: f64, name: Option<String>) -> Self {
        Self {
            id: None,
            floor,
            area,
            name,
            device_ids: Vec::new(),
        }
    }

    /// Create a room carrying its storage-assigned id.
    #[must_use]
    pub fn persisted(id: RoomId, floor: u32, area: f64, name: Option<String>) -> Self {
        Self {
            id: Some(id),
            ..Self::new(floor, area, name)
        }
    }
}

/// The root aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct House {
    floors: Vec<Floor>,
    rooms: Vec<Room>,
    devices: Vec<Device>,
}

impl House {
    /// Create an empty house.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next floor. Levels are contiguous and 1-based, so the
    /// new floor's level is the current floor count plus one.
    pub fn add_floor(&mut self) -> u32 {
        let level = u32::try_from(self.floors.len()).unwrap_or(u32::MAX) + 1;
        self.floors.push(Floor {
            level,
            room_ids: Vec::new(),
        });
        level
    }

    /// Register a room under its floor.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownFloor`] when the room references a
    /// floor level that has not been registered.
    pub fn register_room(&mut self, room: Room) -> Result<(), ValidationError> {
        let Some(floor) = self
            .floors
            .iter_mut()
            .find(|floor| floor.level == room.floor)
        else {
            return Err(ValidationError::UnknownFloor { level: room.floor });
        };
        if let Some(id) = room.id {
            floor.room_ids.push(id);
        }
        self.rooms.push(room);
        Ok(())
    }

    /// Register a device under its room.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownRoom`] when the device references a
    /// room id that has not been registered.
    pub fn register_device(&mut self, device: Device) -> Result<(), ValidationError> {
        let Some(room) = self
            .rooms
            .iter_mut()
            .find(|room| room.id == Some(device.room))
        else {
            return Err(ValidationError::UnknownRoom { room: device.room });
        };
        room.device_ids.push(device.id.clone());
        self.devices.push(device);
        Ok(())
    }

    /// All floors, ordered by level.
    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// All rooms, flat, in registration order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All devices, flat, in registration order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a floor by its 1-based level.
    #[must_use]
    pub fn floor(&self, level: u32) -> Option<&Floor> {
        self.floors.iter().find(|floor| floor.level == level)
    }

    /// Look up a persisted room by its storage id.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == Some(id))
    }

    /// The rooms on the given floor.
    pub fn rooms_on_floor(&self, level: u32) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |room| room.floor == level)
    }

    /// Look up a device by its opaque id.
    #[must_use]
    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == *id)
    }

    /// Mutable device lookup, used to apply actuator state transitions.
    pub fn device_mut(&mut self, id: &DeviceId) -> Option<&mut Device> {
        self.devices.iter_mut().find(|device| device.id == *id)
    }

    /// Total area of the house: the sum of all room areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.rooms.iter().map(|room| room.area).sum()
    }
}

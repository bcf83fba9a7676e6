//! Device — a physical or virtual thing installed in a room.
//!
//! Devices are polymorphic over the capability set {sensor, actuator};
//! the `ActuatorWithSensor` variant has both capabilities at once (e.g. a
//! heat pump that measures and controls temperature). Capabilities are an
//! explicit tag, so "is this a sensor?" is a query on data rather than on a
//! type hierarchy.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{DeviceId, RoomId};

/// The controllable state of an actuator.
///
/// Storage encodes this as a nullable float: `NULL` is off, `1.0` is
/// running without a setpoint, any other value is a numeric setpoint.
/// A legitimate setpoint of exactly 1.0 therefore collides with the
/// running sentinel and decodes as [`ActuatorState::Running`]. This is a
/// known limitation of the storage encoding, preserved for compatibility.
///
/// The JSON representation is `"off"`, `"running"`, or a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "StateRepr", try_from = "StateRepr")]
pub enum ActuatorState {
    /// Not running.
    Off,
    /// Running without a numeric setpoint.
    Running,
    /// Running towards a numeric target, e.g. a target temperature.
    Setpoint(f64),
}

impl ActuatorState {
    /// Decode from the stored nullable float.
    #[must_use]
    pub fn decode(raw: Option<f64>) -> Self {
        match raw {
            None => Self::Off,
            // Sentinel collision: see type-level docs.
            Some(v) if v == 1.0 => Self::Running,
            Some(v) => Self::Setpoint(v),
        }
    }

    /// Encode into the stored nullable float.
    #[must_use]
    pub fn encode(self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::Running => Some(1.0),
            Self::Setpoint(v) => Some(v),
        }
    }

    /// Whether the actuator is running (with or without a setpoint).
    #[must_use]
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Wire representation of [`ActuatorState`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StateRepr {
    Setpoint(f64),
    Keyword(String),
}

impl From<ActuatorState> for StateRepr {
    fn from(state: ActuatorState) -> Self {
        match state {
            ActuatorState::Off => Self::Keyword("off".to_string()),
            ActuatorState::Running => Self::Keyword("running".to_string()),
            ActuatorState::Setpoint(v) => Self::Setpoint(v),
        }
    }
}

impl TryFrom<StateRepr> for ActuatorState {
    type Error = ValidationError;

    fn try_from(repr: StateRepr) -> Result<Self, Self::Error> {
        match repr {
            StateRepr::Setpoint(v) => Ok(Self::Setpoint(v)),
            StateRepr::Keyword(word) => match word.as_str() {
                "off" => Ok(Self::Off),
                "running" => Ok(Self::Running),
                _ => Err(ValidationError::UnknownActuatorState { value: word }),
            },
        }
    }
}

/// Capability variant of a [`Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceVariant {
    /// Produces measurements only.
    Sensor,
    /// Accepts commands and holds a controllable state.
    Actuator(ActuatorState),
    /// Both capabilities at once, e.g. a heat pump.
    ActuatorWithSensor(ActuatorState),
}

/// A device installed in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque identity, stable across storage.
    pub id: DeviceId,
    /// The room this device is installed in (non-owning back-reference).
    pub room: RoomId,
    /// Model name (what storage calls `product`).
    pub model: String,
    /// Manufacturer.
    pub supplier: String,
    /// Free-text kind, e.g. `Temperature Sensor` or `Heat Pump`.
    pub device_type: String,
    /// Capability tag.
    pub variant: DeviceVariant,
}

impl Device {
    /// Create a device after checking the id is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceId`] when `id` is empty.
    pub fn new(
        id: impl Into<DeviceId>,
        room: RoomId,
        model: impl Into<String>,
        supplier: impl Into<String>,
        device_type: impl Into<String>,
        variant: DeviceVariant,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.as_str().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(Self {
            id,
            room,
            model: model.into(),
            supplier: supplier.into(),
            device_type: device_type.into(),
            variant,
        })
    }

    /// Whether this device produces measurements.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        matches!(
            self.variant,
            DeviceVariant::Sensor | DeviceVariant::ActuatorWithSensor(_)
        )
    }

    /// Whether this device accepts commands.
    #[must_use]
    pub fn is_actuator(&self) -> bool {
        matches!(
            self.variant,
            DeviceVariant::Actuator(_) | DeviceVariant::ActuatorWithSensor(_)
        )
    }

    /// The current actuator state, if this device is an actuator.
    #[must_use]
    pub fn actuator_state(&self) -> Option<ActuatorState> {
        match self.variant {
            DeviceVariant::Actuator(state) | DeviceVariant::ActuatorWithSensor(state) => {
                Some(state)
            }
            DeviceVariant::Sensor => None,
        }
    }

    /// Set the actuator state. Silently ignored for plain sensors.
    pub fn set_actuator_state(&mut self, state: ActuatorState) {
        match &mut self.variant {
            DeviceVariant::Actuator(current) | DeviceVariant::ActuatorWithSensor(current) => {
                *current = state;
            }
            DeviceVariant::Sensor => {}
        }
    }

    /// Turn the actuator on without a setpoint.
    pub fn turn_on(&mut self) {
        self.set_actuator_state(ActuatorState::Running);
    }

    /// Turn the actuator on towards a numeric setpoint.
    pub fn turn_on_with(&mut self, setpoint: f64) {
        self.set_actuator_state(ActuatorState::Setpoint(setpoint));
    }

    /// Turn the actuator off.
    pub fn turn_off(&mut self) {
        self.set_actuator_state(ActuatorState::Off);
    }
}

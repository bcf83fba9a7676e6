//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHouseError`] via `#[from]` or explicit boxing. Not-found and
//! empty-result conditions are expected outcomes and carry enough context
//! for the HTTP layer to translate them into status codes.

use crate::id::RoomId;

/// Top-level error for the smarthouse workspace.
#[derive(Debug, thiserror::Error)]
pub enum SmartHouseError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The storage layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Violations of domain invariants.
///
/// During the one-shot deep load these are fatal: the process must not
/// serve traffic with a partial house graph.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A room references a floor level that is not registered.
    #[error("floor {level} is not registered")]
    UnknownFloor { level: u32 },

    /// A device references a room that is not registered.
    #[error("room {room} is not registered")]
    UnknownRoom { room: RoomId },

    /// Device identifiers are opaque but must not be empty.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// The stored device category is neither `sensor` nor `actuator`.
    #[error("unsupported device category `{category}`")]
    UnknownCategory { category: String },

    /// An actuator state keyword other than `off` or `running`.
    #[error("unsupported actuator state `{value}`")]
    UnknownActuatorState { value: String },
}

/// A lookup failed: the entity kind and the identifier that was requested.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

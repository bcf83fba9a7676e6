//! # smarthouse-domain
//!
//! Pure domain model for the smarthouse system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define the **House** aggregate (floors, rooms, devices) with its
//!   containment invariants
//! - Define **Devices** and their capability variants (sensor, actuator,
//!   actuator with built-in sensor) together with the actuator state machine
//! - Define **Measurements** (timestamped sensor readings)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod device;
pub mod error;
pub mod house;
pub mod id;
pub mod measurement;

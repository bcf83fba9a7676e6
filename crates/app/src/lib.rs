//! # smarthouse-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports):
//!   - `HouseRepository` — one-shot deep load of the house graph and
//!     write-through of actuator states
//!   - `MeasurementRepository` — the sensor time series and the two
//!     aggregate statistics
//! - Provide **use-case services**:
//!   - `HouseService` — holds the in-memory house graph, answers structure
//!     queries, applies actuator commands
//!   - `TelemetryService` — measurement queries and room statistics
//!
//! ## Dependency rule
//! Depends on `smarthouse-domain` only (plus `tokio::sync` for the graph
//! lock). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod ports;
pub mod services;

//! # smarthouse-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API over the house structure, the sensor time series,
//!   actuator control, and the room statistics
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results into HTTP responses: not-found and
//!   empty-series sentinels become 404s, validation failures 400s,
//!   storage failures opaque 500s
//!
//! ## Dependency rule
//! Depends on `smarthouse-app` (for port traits and services) and
//! `smarthouse-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

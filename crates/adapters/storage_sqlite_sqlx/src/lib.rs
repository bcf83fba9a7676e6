//! # smarthouse-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `smarthouse-app`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `smarthouse-app` (for port traits) and `smarthouse-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod house_repo;
pub mod measurement_repo;
pub mod pool;

pub use error::StorageError;
pub use house_repo::SqliteHouseRepository;
pub use measurement_repo::SqliteMeasurementRepository;
pub use pool::{Config, Database};

//! Shared application state for axum handlers.

use std::sync::Arc;

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};
use smarthouse_app::services::house_service::HouseService;
use smarthouse_app::services::telemetry_service::TelemetryService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch. `Clone` is
/// implemented manually so the underlying types themselves do not need to
/// be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<HR, MR> {
    /// House structure queries and actuator commands.
    pub house: Arc<HouseService<HR>>,
    /// Measurement queries and room statistics.
    pub telemetry: Arc<TelemetryService<MR>>,
}

impl<HR, MR> Clone for AppState<HR, MR> {
    fn clone(&self) -> Self {
        Self {
            house: Arc::clone(&self.house),
            telemetry: Arc::clone(&self.telemetry),
        }
    }
}

impl<HR, MR> AppState<HR, MR>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(house: HouseService<HR>, telemetry: TelemetryService<MR>) -> Self {
        Self {
            house: Arc::new(house),
            telemetry: Arc::new(telemetry),
        }
    }
}

//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod actuators;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod house;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;
#[allow(clippy::missing_errors_doc)]
pub mod stats;

use axum::Router;
use axum::routing::{delete, get, put};

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};

use crate::state::AppState;

/// Build the `/smarthouse` sub-router.
pub fn routes<HR, MR>() -> Router<AppState<HR, MR>>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    Router::new()
        // House structure
        .route("/", get(house::summary::<HR, MR>))
        .route("/floor", get(house::list_floors::<HR, MR>))
        .route("/floor/{fid}", get(house::get_floor::<HR, MR>))
        .route("/floor/{fid}/room", get(house::list_rooms::<HR, MR>))
        .route("/floor/{fid}/room/{rid}", get(house::get_room::<HR, MR>))
        // Room statistics
        .route(
            "/floor/{fid}/room/{rid}/temperature/daily",
            get(stats::daily_temperatures::<HR, MR>),
        )
        .route(
            "/floor/{fid}/room/{rid}/humidity/hours",
            get(stats::humid_hours::<HR, MR>),
        )
        // Devices
        .route("/device", get(devices::list::<HR, MR>))
        .route("/device/{id}", get(devices::get::<HR, MR>))
        // Sensor time series
        .route(
            "/sensor/{id}/current",
            get(sensors::current::<HR, MR>).post(sensors::record::<HR, MR>),
        )
        .route("/sensor/{id}/values", get(sensors::values::<HR, MR>))
        .route("/sensor/{id}/oldest", delete(sensors::delete_oldest::<HR, MR>))
        // Actuator control
        .route("/actuator/{id}/current", get(actuators::current::<HR, MR>))
        .route("/actuator/{id}", put(actuators::update::<HR, MR>))
}

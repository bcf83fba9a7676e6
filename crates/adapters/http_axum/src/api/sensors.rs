//! JSON REST handlers for the sensor time series.
//!
//! Every handler first resolves the device through the house service and
//! requires sensor capability; the time series itself is keyed by device id
//! and never consults the in-memory graph.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};
use smarthouse_domain::error::{NotFoundError, SmartHouseError};
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::measurement::Measurement;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the history endpoint.
#[derive(Deserialize)]
pub struct HistoryQuery {
    /// Cap on the number of readings returned, newest first.
    pub n: Option<usize>,
}

/// `GET /smarthouse/sensor/{id}/current`
pub async fn current<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
) -> Result<Json<Measurement>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let sensor = state.house.sensor(&DeviceId::from(id)).await?;
    let reading = state.telemetry.latest(&sensor.id).await?.ok_or_else(|| {
        SmartHouseError::from(NotFoundError {
            entity: "Reading",
            id: sensor.id.to_string(),
        })
    })?;
    Ok(Json(reading))
}

/// `POST /smarthouse/sensor/{id}/current`
pub async fn record<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
    Json(measurement): Json<Measurement>,
) -> Result<(StatusCode, Json<Measurement>), ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let sensor = state.house.sensor(&DeviceId::from(id)).await?;
    let stored = state.telemetry.record(&sensor.id, measurement).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /smarthouse/sensor/{id}/values`
pub async fn values<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Measurement>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let sensor = state.house.sensor(&DeviceId::from(id)).await?;
    let readings = state.telemetry.history(&sensor.id, query.n).await?;
    Ok(Json(readings))
}

/// `DELETE /smarthouse/sensor/{id}/oldest`
///
/// Returns the removed reading, or `null` when the series was already
/// empty — an expected outcome, not an error.
pub async fn delete_oldest<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Measurement>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let sensor = state.house.sensor(&DeviceId::from(id)).await?;
    let removed = state.telemetry.drop_oldest(&sensor.id).await?;
    Ok(Json(removed))
}

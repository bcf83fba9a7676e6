//! JSON REST handlers for per-room statistics.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};
use smarthouse_domain::id::RoomId;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional date bounds, both inclusive.
#[derive(Deserialize)]
pub struct TemperatureQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct HumidityQuery {
    pub date: NaiveDate,
}

/// `GET /smarthouse/floor/{fid}/room/{rid}/temperature/daily`
pub async fn daily_temperatures<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path((fid, rid)): Path<(u32, i64)>,
    Query(query): Query<TemperatureQuery>,
) -> Result<Json<BTreeMap<NaiveDate, f64>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let room = state.house.room(fid, RoomId::new(rid)).await?;
    let averages = state
        .telemetry
        .daily_temperature_averages(&room, query.from, query.until)
        .await?;
    Ok(Json(averages))
}

/// `GET /smarthouse/floor/{fid}/room/{rid}/humidity/hours`
pub async fn humid_hours<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path((fid, rid)): Path<(u32, i64)>,
    Query(query): Query<HumidityQuery>,
) -> Result<Json<Vec<u32>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let room = state.house.room(fid, RoomId::new(rid)).await?;
    let hours = state
        .telemetry
        .humid_hours_above_average(&room, query.date)
        .await?;
    Ok(Json(hours))
}

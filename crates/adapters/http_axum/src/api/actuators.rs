//! JSON REST handlers for actuator control.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};
use smarthouse_domain::device::ActuatorState;
use smarthouse_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Wire shape of an actuator state: `{"state": "off" | "running" | <number>}`.
#[derive(Serialize, Deserialize)]
pub struct ActuatorStateInfo {
    pub state: ActuatorState,
}

/// `GET /smarthouse/actuator/{id}/current`
pub async fn current<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
) -> Result<Json<ActuatorStateInfo>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let current = state.house.actuator_state(&DeviceId::from(id)).await?;
    Ok(Json(ActuatorStateInfo { state: current }))
}

/// `PUT /smarthouse/actuator/{id}`
pub async fn update<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
    Json(target): Json<ActuatorStateInfo>,
) -> Result<Json<ActuatorStateInfo>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let applied = state
        .house
        .set_actuator_state(&DeviceId::from(id), target.state)
        .await?;
    Ok(Json(ActuatorStateInfo { state: applied }))
}

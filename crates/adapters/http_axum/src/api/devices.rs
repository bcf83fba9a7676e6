//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};
use smarthouse_domain::device::{Device, DeviceVariant};
use smarthouse_domain::id::{DeviceId, RoomId};

use crate::error::ApiError;
use crate::state::AppState;

/// A device and its capability category.
#[derive(Serialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub model: String,
    pub supplier: String,
    pub device_type: String,
    pub device_category: &'static str,
    pub room: RoomId,
}

impl From<Device> for DeviceInfo {
    fn from(device: Device) -> Self {
        let device_category = match device.variant {
            DeviceVariant::Sensor => "sensor",
            DeviceVariant::Actuator(_) => "actuator",
            DeviceVariant::ActuatorWithSensor(_) => "actuator_with_sensor",
        };
        Self {
            id: device.id,
            model: device.model,
            supplier: device.supplier,
            device_type: device.device_type,
            device_category,
            room: device.room,
        }
    }
}

/// `GET /smarthouse/device`
pub async fn list<HR, MR>(
    State(state): State<AppState<HR, MR>>,
) -> Result<Json<Vec<DeviceInfo>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let devices = state.house.devices().await;
    Ok(Json(devices.into_iter().map(DeviceInfo::from).collect()))
}

/// `GET /smarthouse/device/{id}`
pub async fn get<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(id): Path<String>,
) -> Result<Json<DeviceInfo>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let device = state.house.device(&DeviceId::from(id)).await?;
    Ok(Json(device.into()))
}

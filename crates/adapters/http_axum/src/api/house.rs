//! JSON REST handlers for the house structure: summary, floors, rooms.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use smarthouse_app::ports::{HouseRepository, MeasurementRepository};
use smarthouse_domain::house::{Floor, Room};
use smarthouse_domain::id::{DeviceId, RoomId};

use crate::error::ApiError;
use crate::state::AppState;

/// Structural overview of the whole house.
#[derive(Serialize)]
pub struct SmartHouseInfo {
    pub no_rooms: usize,
    pub no_floors: usize,
    pub total_area: f64,
    pub no_devices: usize,
}

/// A floor and the ids of its rooms.
#[derive(Serialize)]
pub struct FloorInfo {
    pub fid: u32,
    pub rooms: Vec<RoomId>,
}

impl From<Floor> for FloorInfo {
    fn from(floor: Floor) -> Self {
        Self {
            fid: floor.level,
            rooms: floor.room_ids,
        }
    }
}

/// A room and the ids of its devices.
#[derive(Serialize)]
pub struct RoomInfo {
    pub rid: Option<RoomId>,
    pub room_size: f64,
    pub room_name: Option<String>,
    pub floor: u32,
    pub devices: Vec<DeviceId>,
}

impl From<Room> for RoomInfo {
    fn from(room: Room) -> Self {
        Self {
            rid: room.id,
            room_size: room.area,
            room_name: room.name,
            floor: room.floor,
            devices: room.device_ids,
        }
    }
}

/// `GET /smarthouse`
pub async fn summary<HR, MR>(
    State(state): State<AppState<HR, MR>>,
) -> Result<Json<SmartHouseInfo>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let summary = state.house.summary().await;
    Ok(Json(SmartHouseInfo {
        no_rooms: summary.rooms,
        no_floors: summary.floors,
        total_area: summary.total_area,
        no_devices: summary.devices,
    }))
}

/// `GET /smarthouse/floor`
pub async fn list_floors<HR, MR>(
    State(state): State<AppState<HR, MR>>,
) -> Result<Json<Vec<FloorInfo>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let floors = state.house.floors().await;
    Ok(Json(floors.into_iter().map(FloorInfo::from).collect()))
}

/// `GET /smarthouse/floor/{fid}`
pub async fn get_floor<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(fid): Path<u32>,
) -> Result<Json<FloorInfo>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let floor = state.house.floor(fid).await?;
    Ok(Json(floor.into()))
}

/// `GET /smarthouse/floor/{fid}/room`
pub async fn list_rooms<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path(fid): Path<u32>,
) -> Result<Json<Vec<RoomInfo>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let rooms = state.house.rooms_on_floor(fid).await?;
    Ok(Json(rooms.into_iter().map(RoomInfo::from).collect()))
}

/// `GET /smarthouse/floor/{fid}/room/{rid}`
pub async fn get_room<HR, MR>(
    State(state): State<AppState<HR, MR>>,
    Path((fid, rid)): Path<(u32, i64)>,
) -> Result<Json<RoomInfo>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    MR: MeasurementRepository + Send + Sync + 'static,
{
    let room = state.house.room(fid, RoomId::new(rid)).await?;
    Ok(Json(room.into()))
}

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AdminState;
use crate::error::AppError;
use crate::hostel::domain::{NewRoom, Room, RoomId, RoomPatch};
use crate::hostel::repository::HostelRepository;
use crate::hostel::service::{RoomFilter, RoomImportSummary};
use crate::hostel::{BulkActionOutcome, Page, PageRequest, RoomCsvImporter, ServiceError};

/// Room as shown on the changelist, with its computed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomRow {
    #[serde(flatten)]
    pub room: Room,
    pub available_beds: i64,
    pub is_full: bool,
}

impl From<Room> for RoomRow {
    fn from(room: Room) -> Self {
        Self {
            available_beds: room.available_beds(),
            is_full: room.is_full(),
            room,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectedRooms {
    pub(crate) ids: Vec<RoomId>,
}

pub(crate) async fn list_rooms<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<RoomFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<RoomRow>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let rooms = admin.list_rooms(&filter, page)?;
    Ok(Json(rooms.map(RoomRow::from)))
}

pub(crate) async fn create_room<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewRoom>,
) -> Result<(StatusCode, Json<RoomRow>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let room = admin.create_room(draft)?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

pub(crate) async fn get_room<R>(
    State(admin): AdminState<R>,
    Path(id): Path<RoomId>,
) -> Result<Json<RoomRow>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.get_room(id).map(|room| Json(room.into()))
}

pub(crate) async fn update_room<R>(
    State(admin): AdminState<R>,
    Path(id): Path<RoomId>,
    Json(patch): Json<RoomPatch>,
) -> Result<Json<RoomRow>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.update_room(id, patch).map(|room| Json(room.into()))
}

pub(crate) async fn delete_room<R>(
    State(admin): AdminState<R>,
    Path(id): Path<RoomId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_room(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn make_available<R>(
    State(admin): AdminState<R>,
    Json(selected): Json<SelectedRooms>,
) -> Result<Json<BulkActionOutcome>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.make_rooms_available(&selected.ids).map(Json)
}

pub(crate) async fn make_unavailable<R>(
    State(admin): AdminState<R>,
    Json(selected): Json<SelectedRooms>,
) -> Result<Json<BulkActionOutcome>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.make_rooms_unavailable(&selected.ids).map(Json)
}

/// Accepts the inventory spreadsheet as a CSV body.
pub(crate) async fn import_rooms<R>(State(admin): AdminState<R>, body: String) -> Response
where
    R: HostelRepository + 'static,
{
    let sheet = match RoomCsvImporter::from_reader(body.as_bytes()) {
        Ok(sheet) => sheet,
        Err(err) => return AppError::from(err).into_response(),
    };

    match admin.import_room_sheet(sheet) {
        Ok(RoomImportSummary { created, skipped }) => {
            let created: Vec<RoomRow> = created.into_iter().map(RoomRow::from).collect();
            let payload = serde_json::json!({ "created": created, "skipped": skipped });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

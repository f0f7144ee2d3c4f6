use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::AdminState;
use crate::hostel::domain::{
    AllocationId, ApplicationDecision, ApplicationId, NewRoomAllocation, NewRoomApplication,
    RoomAllocation, RoomApplication,
};
use crate::hostel::repository::HostelRepository;
use crate::hostel::service::{AllocationFilter, ApplicationFilter, Labelled};
use crate::hostel::{Page, PageRequest, ServiceError};

pub(crate) async fn list_applications<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<ApplicationFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Labelled<RoomApplication>>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let applications = admin.list_applications(&filter, page)?;
    admin.labelled_page(applications).map(Json)
}

pub(crate) async fn submit_application<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewRoomApplication>,
) -> Result<(StatusCode, Json<RoomApplication>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let application = admin.submit_application(draft)?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn get_application<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<Labelled<RoomApplication>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let application = admin.get_application(id)?;
    admin.labelled(application).map(Json)
}

pub(crate) async fn decide_application<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ApplicationId>,
    Json(decision): Json<ApplicationDecision>,
) -> Result<Json<RoomApplication>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.decide_application(id, decision).map(Json)
}

pub(crate) async fn delete_application<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ApplicationId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_application(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_allocations<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<AllocationFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Labelled<RoomAllocation>>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let allocations = admin.list_allocations(&filter, page)?;
    admin.labelled_page(allocations).map(Json)
}

pub(crate) async fn allocate_room<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewRoomAllocation>,
) -> Result<(StatusCode, Json<RoomAllocation>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let allocation = admin.allocate_room(draft)?;
    Ok((StatusCode::CREATED, Json(allocation)))
}

pub(crate) async fn get_allocation<R>(
    State(admin): AdminState<R>,
    Path(id): Path<AllocationId>,
) -> Result<Json<Labelled<RoomAllocation>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let allocation = admin.get_allocation(id)?;
    admin.labelled(allocation).map(Json)
}

/// Releasing returns the bed to the room.
pub(crate) async fn release_allocation<R>(
    State(admin): AdminState<R>,
    Path(id): Path<AllocationId>,
) -> Result<Json<RoomAllocation>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.release_allocation(id).map(Json)
}

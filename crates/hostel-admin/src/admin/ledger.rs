use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::AdminState;
use crate::hostel::domain::{
    LostItem, LostItemId, LostItemPatch, NewLostItem, NewStipend, StipendId, StipendTransaction,
};
use crate::hostel::repository::HostelRepository;
use crate::hostel::service::{Labelled, LostItemFilter, StipendFilter};
use crate::hostel::{BulkActionOutcome, Page, PageRequest, ServiceError};

pub(crate) async fn list_stipends<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<StipendFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Labelled<StipendTransaction>>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let stipends = admin.list_stipends(&filter, page)?;
    admin.labelled_page(stipends).map(Json)
}

pub(crate) async fn record_stipend<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewStipend>,
) -> Result<(StatusCode, Json<StipendTransaction>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let stipend = admin.record_stipend(draft)?;
    Ok((StatusCode::CREATED, Json(stipend)))
}

pub(crate) async fn get_stipend<R>(
    State(admin): AdminState<R>,
    Path(id): Path<StipendId>,
) -> Result<Json<Labelled<StipendTransaction>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let stipend = admin.get_stipend(id)?;
    admin.labelled(stipend).map(Json)
}

pub(crate) async fn delete_stipend<R>(
    State(admin): AdminState<R>,
    Path(id): Path<StipendId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_stipend(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_lost_items<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<LostItemFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<LostItem>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.list_lost_items(&filter, page).map(Json)
}

pub(crate) async fn report_lost_item<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewLostItem>,
) -> Result<(StatusCode, Json<LostItem>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let item = admin.report_lost_item(draft)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn get_lost_item<R>(
    State(admin): AdminState<R>,
    Path(id): Path<LostItemId>,
) -> Result<Json<LostItem>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.get_lost_item(id).map(Json)
}

pub(crate) async fn update_lost_item<R>(
    State(admin): AdminState<R>,
    Path(id): Path<LostItemId>,
    Json(patch): Json<LostItemPatch>,
) -> Result<Json<LostItem>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.update_lost_item(id, patch).map(Json)
}

pub(crate) async fn delete_lost_item<R>(
    State(admin): AdminState<R>,
    Path(id): Path<LostItemId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_lost_item(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn expire_lost_items<R>(
    State(admin): AdminState<R>,
) -> Result<Json<BulkActionOutcome>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.expire_lost_items().map(Json)
}

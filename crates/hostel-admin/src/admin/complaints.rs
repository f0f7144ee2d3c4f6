use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::AdminState;
use crate::hostel::domain::{Complaint, ComplaintId, ComplaintPatch, NewComplaint};
use crate::hostel::repository::HostelRepository;
use crate::hostel::service::ComplaintFilter;
use crate::hostel::{Page, PageRequest, ServiceError};

pub(crate) async fn list_complaints<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<ComplaintFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Complaint>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.list_complaints(&filter, page).map(Json)
}

pub(crate) async fn file_complaint<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewComplaint>,
) -> Result<(StatusCode, Json<Complaint>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let complaint = admin.file_complaint(draft)?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

pub(crate) async fn get_complaint<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ComplaintId>,
) -> Result<Json<Complaint>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.get_complaint(id).map(Json)
}

pub(crate) async fn complaint_by_ticket<R>(
    State(admin): AdminState<R>,
    Path(ticket): Path<String>,
) -> Result<Json<Complaint>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.complaint_by_ticket(&ticket).map(Json)
}

pub(crate) async fn update_complaint<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ComplaintId>,
    Json(patch): Json<ComplaintPatch>,
) -> Result<Json<Complaint>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.update_complaint(id, patch).map(Json)
}

pub(crate) async fn delete_complaint<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ComplaintId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_complaint(id)?;
    Ok(StatusCode::NO_CONTENT)
}

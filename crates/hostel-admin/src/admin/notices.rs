use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::AdminState;
use crate::hostel::domain::{
    AttachmentId, NewAttachment, NewNotice, Notice, NoticeAttachment, NoticeId, NoticePatch,
};
use crate::hostel::repository::HostelRepository;
use crate::hostel::service::{Labelled, NoticeFilter};
use crate::hostel::{Page, PageRequest, ServiceError};

pub(crate) async fn list_notices<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<NoticeFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Notice>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.list_notices(&filter, page).map(Json)
}

pub(crate) async fn publish_notice<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewNotice>,
) -> Result<(StatusCode, Json<Notice>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let notice = admin.publish_notice(draft)?;
    Ok((StatusCode::CREATED, Json(notice)))
}

pub(crate) async fn get_notice<R>(
    State(admin): AdminState<R>,
    Path(id): Path<NoticeId>,
) -> Result<Json<Notice>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.get_notice(id).map(Json)
}

pub(crate) async fn update_notice<R>(
    State(admin): AdminState<R>,
    Path(id): Path<NoticeId>,
    Json(patch): Json<NoticePatch>,
) -> Result<Json<Notice>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.update_notice(id, patch).map(Json)
}

pub(crate) async fn delete_notice<R>(
    State(admin): AdminState<R>,
    Path(id): Path<NoticeId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_notice(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_attachments<R>(
    State(admin): AdminState<R>,
    Path(id): Path<NoticeId>,
) -> Result<Json<Vec<Labelled<NoticeAttachment>>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let attachments = admin.list_attachments(id)?;
    admin.labelled_all(attachments).map(Json)
}

pub(crate) async fn add_attachment<R>(
    State(admin): AdminState<R>,
    Path(id): Path<NoticeId>,
    Json(upload): Json<NewAttachment>,
) -> Result<(StatusCode, Json<NoticeAttachment>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let attachment = admin.add_attachment(id, upload)?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

pub(crate) async fn delete_attachment<R>(
    State(admin): AdminState<R>,
    Path(id): Path<AttachmentId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_attachment(id)?;
    Ok(StatusCode::NO_CONTENT)
}

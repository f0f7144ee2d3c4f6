use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::AdminState;
use crate::hostel::domain::{
    CustomUser, NewStudentProfile, NewUser, ProfileId, StudentProfile, StudentProfilePatch,
    UserId, UserPatch,
};
use crate::hostel::repository::HostelRepository;
use crate::hostel::service::{Labelled, StudentFilter, UserFilter};
use crate::hostel::{Page, PageRequest, ServiceError};

pub(crate) async fn list_users<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<UserFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<CustomUser>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.list_users(&filter, page).map(Json)
}

pub(crate) async fn create_user<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewUser>,
) -> Result<(StatusCode, Json<CustomUser>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let user = admin.create_user(draft)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(crate) async fn get_user<R>(
    State(admin): AdminState<R>,
    Path(id): Path<UserId>,
) -> Result<Json<CustomUser>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.get_user(id).map(Json)
}

pub(crate) async fn update_user<R>(
    State(admin): AdminState<R>,
    Path(id): Path<UserId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<CustomUser>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.update_user(id, patch).map(Json)
}

pub(crate) async fn delete_user<R>(
    State(admin): AdminState<R>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_user(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn user_profile<R>(
    State(admin): AdminState<R>,
    Path(id): Path<UserId>,
) -> Result<Json<Labelled<StudentProfile>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let profile = admin.profile_for_user(id)?;
    admin.labelled(profile).map(Json)
}

pub(crate) async fn list_students<R>(
    State(admin): AdminState<R>,
    Query(filter): Query<StudentFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Labelled<StudentProfile>>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let profiles = admin.list_student_profiles(&filter, page)?;
    admin.labelled_page(profiles).map(Json)
}

pub(crate) async fn create_student<R>(
    State(admin): AdminState<R>,
    Json(draft): Json<NewStudentProfile>,
) -> Result<(StatusCode, Json<StudentProfile>), ServiceError>
where
    R: HostelRepository + 'static,
{
    let profile = admin.create_student_profile(draft)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub(crate) async fn get_student<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ProfileId>,
) -> Result<Json<Labelled<StudentProfile>>, ServiceError>
where
    R: HostelRepository + 'static,
{
    let profile = admin.get_student_profile(id)?;
    admin.labelled(profile).map(Json)
}

pub(crate) async fn update_student<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ProfileId>,
    Json(patch): Json<StudentProfilePatch>,
) -> Result<Json<StudentProfile>, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.update_student_profile(id, patch).map(Json)
}

pub(crate) async fn delete_student<R>(
    State(admin): AdminState<R>,
    Path(id): Path<ProfileId>,
) -> Result<StatusCode, ServiceError>
where
    R: HostelRepository + 'static,
{
    admin.delete_student_profile(id)?;
    Ok(StatusCode::NO_CONTENT)
}

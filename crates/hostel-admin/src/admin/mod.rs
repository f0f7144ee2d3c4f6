//! JSON admin site for the hostel office, mounted under `/api/v1/admin`.

mod accounts;
mod allocations;
mod complaints;
mod error;
mod ledger;
mod notices;
mod rooms;
pub mod site;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::hostel::repository::HostelRepository;
use crate::hostel::HostelAdmin;

pub use rooms::RoomRow;
pub use site::{AdminAction, AdminSite, Fieldset, ModelAdmin};

pub const ADMIN_PREFIX: &str = "/api/v1/admin";

pub(crate) type AdminState<R> = State<Arc<HostelAdmin<R>>>;

/// Router builder exposing the admin changelists, forms and actions.
pub fn admin_router<R>(admin: Arc<HostelAdmin<R>>) -> Router
where
    R: HostelRepository + 'static,
{
    let site = Router::new()
        .route("/", get(index_handler::<R>))
        .route(
            "/users",
            get(accounts::list_users::<R>).post(accounts::create_user::<R>),
        )
        .route(
            "/users/:id",
            get(accounts::get_user::<R>)
                .patch(accounts::update_user::<R>)
                .delete(accounts::delete_user::<R>),
        )
        .route("/users/:id/profile", get(accounts::user_profile::<R>))
        .route(
            "/students",
            get(accounts::list_students::<R>).post(accounts::create_student::<R>),
        )
        .route(
            "/students/:id",
            get(accounts::get_student::<R>)
                .patch(accounts::update_student::<R>)
                .delete(accounts::delete_student::<R>),
        )
        .route(
            "/rooms",
            get(rooms::list_rooms::<R>).post(rooms::create_room::<R>),
        )
        .route("/rooms/import", post(rooms::import_rooms::<R>))
        .route(
            "/rooms/actions/make_available",
            post(rooms::make_available::<R>),
        )
        .route(
            "/rooms/actions/make_unavailable",
            post(rooms::make_unavailable::<R>),
        )
        .route(
            "/rooms/:id",
            get(rooms::get_room::<R>)
                .patch(rooms::update_room::<R>)
                .delete(rooms::delete_room::<R>),
        )
        .route(
            "/applications",
            get(allocations::list_applications::<R>).post(allocations::submit_application::<R>),
        )
        .route(
            "/applications/:id",
            get(allocations::get_application::<R>).delete(allocations::delete_application::<R>),
        )
        .route(
            "/applications/:id/decision",
            post(allocations::decide_application::<R>),
        )
        .route(
            "/allocations",
            get(allocations::list_allocations::<R>).post(allocations::allocate_room::<R>),
        )
        .route(
            "/allocations/:id",
            get(allocations::get_allocation::<R>).delete(allocations::release_allocation::<R>),
        )
        .route(
            "/complaints",
            get(complaints::list_complaints::<R>).post(complaints::file_complaint::<R>),
        )
        .route(
            "/complaints/by-ticket/:ticket",
            get(complaints::complaint_by_ticket::<R>),
        )
        .route(
            "/complaints/:id",
            get(complaints::get_complaint::<R>)
                .patch(complaints::update_complaint::<R>)
                .delete(complaints::delete_complaint::<R>),
        )
        .route(
            "/notices",
            get(notices::list_notices::<R>).post(notices::publish_notice::<R>),
        )
        .route(
            "/notices/:id",
            get(notices::get_notice::<R>)
                .patch(notices::update_notice::<R>)
                .delete(notices::delete_notice::<R>),
        )
        .route(
            "/notices/:id/attachments",
            get(notices::list_attachments::<R>).post(notices::add_attachment::<R>),
        )
        .route(
            "/notice-attachments/:id",
            delete(notices::delete_attachment::<R>),
        )
        .route(
            "/stipends",
            get(ledger::list_stipends::<R>).post(ledger::record_stipend::<R>),
        )
        .route(
            "/stipends/:id",
            get(ledger::get_stipend::<R>).delete(ledger::delete_stipend::<R>),
        )
        .route(
            "/lost-items",
            get(ledger::list_lost_items::<R>).post(ledger::report_lost_item::<R>),
        )
        .route(
            "/lost-items/actions/mark_expired",
            post(ledger::expire_lost_items::<R>),
        )
        .route(
            "/lost-items/:id",
            get(ledger::get_lost_item::<R>)
                .patch(ledger::update_lost_item::<R>)
                .delete(ledger::delete_lost_item::<R>),
        )
        .with_state(admin);

    Router::new().nest(ADMIN_PREFIX, site)
}

pub(crate) async fn index_handler<R>(State(admin): AdminState<R>) -> Json<AdminSite>
where
    R: HostelRepository + 'static,
{
    Json(AdminSite::hostel(admin.list_per_page()))
}

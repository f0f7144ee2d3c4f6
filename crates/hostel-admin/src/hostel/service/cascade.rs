//! Deletion rules mirroring the foreign keys between hostel records.

use tracing::debug;

use crate::hostel::domain::{NoticeId, ProfileId, RoomAllocation, RoomId, UserId};
use crate::hostel::store::HostelTables;

/// Frees the bed held by `allocation` and clears the student's allocation flag.
pub(super) fn vacate(tables: &mut HostelTables, allocation: &RoomAllocation) {
    if let Some(room) = tables.rooms.get_mut(allocation.room) {
        room.current_occupancy = room.current_occupancy.saturating_sub(1);
    }
    if let Some(profile) = tables.student_profiles.get_mut(allocation.student) {
        profile.is_allocated = false;
    }
}

pub(super) fn remove_notice(tables: &mut HostelTables, notice: NoticeId) {
    tables.notices.remove(notice);
    let attachments = tables
        .notice_attachments
        .remove_where(|attachment| attachment.notice == notice);
    debug!(%notice, attachments = attachments.len(), "notice removed");
}

pub(super) fn remove_profile(tables: &mut HostelTables, profile: ProfileId) {
    for allocation in tables
        .room_allocations
        .remove_where(|allocation| allocation.student == profile)
    {
        vacate(tables, &allocation);
    }
    tables
        .room_applications
        .remove_where(|application| application.student == profile);
    tables
        .complaints
        .remove_where(|complaint| complaint.student == profile);
    tables
        .stipend_transactions
        .remove_where(|stipend| stipend.student == profile);
    tables.lost_items.remove_where(|item| item.reporter == profile);
    tables.student_profiles.remove(profile);
}

pub(super) fn remove_room(tables: &mut HostelTables, room: RoomId) {
    for allocation in tables
        .room_allocations
        .remove_where(|allocation| allocation.room == room)
    {
        if let Some(profile) = tables.student_profiles.get_mut(allocation.student) {
            profile.is_allocated = false;
        }
    }
    tables
        .room_applications
        .remove_where(|application| application.room == room);
    tables.rooms.remove(room);
}

pub(super) fn remove_user(tables: &mut HostelTables, user: UserId) {
    let owned_profile = tables
        .student_profiles
        .find(|profile| profile.user == user)
        .map(|profile| profile.id);
    if let Some(profile) = owned_profile {
        remove_profile(tables, profile);
    }

    for allocation in tables
        .room_allocations
        .remove_where(|allocation| allocation.allocated_by == user)
    {
        vacate(tables, &allocation);
    }

    let notices: Vec<NoticeId> = tables
        .notices
        .iter()
        .filter(|notice| notice.created_by == user)
        .map(|notice| notice.id)
        .collect();
    for notice in notices {
        remove_notice(tables, notice);
    }

    tables
        .stipend_transactions
        .remove_where(|stipend| stipend.processed_by == user);

    for application in tables.room_applications.iter_mut() {
        if application.processed_by == Some(user) {
            application.processed_by = None;
        }
    }
    for complaint in tables.complaints.iter_mut() {
        if complaint.assigned_to == Some(user) {
            complaint.assigned_to = None;
        }
    }

    tables.users.remove(user);
}

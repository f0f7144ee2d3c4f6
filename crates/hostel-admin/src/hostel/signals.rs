//! Post-save receivers. They run inside the transaction of the save that fired them.

use chrono::NaiveDate;
use tracing::info;

use super::domain::{CustomUser, StudentProfile};
use super::service::{ensure_unique, ServiceError};
use super::store::HostelTables;

/// Gives every newly created student account a placeholder profile.
///
/// Updates never create profiles, even when the role changes to student.
pub(crate) fn user_saved(
    tables: &mut HostelTables,
    user: &CustomUser,
    created: bool,
    today: NaiveDate,
) -> Result<Option<StudentProfile>, ServiceError> {
    if !created || !user.is_student() {
        return Ok(None);
    }
    if tables
        .student_profiles
        .find(|profile| profile.user == user.id)
        .is_some()
    {
        return Ok(None);
    }

    let profile = tables
        .student_profiles
        .insert_with(|id| StudentProfile::placeholder(id, user.id, today));
    ensure_unique(
        &tables.student_profiles,
        profile.id,
        "student_id",
        &profile.student_id,
        |row| row.student_id.as_str(),
    )?;

    info!(user = %user.username, student_id = %profile.student_id, "placeholder student profile created");
    Ok(Some(profile))
}

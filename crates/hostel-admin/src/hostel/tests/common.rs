use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::clock::ManualClock;
use crate::hostel::domain::{CustomUser, NewRoom, NewUser, Room, StudentProfile, UserRole};
use crate::hostel::repository::{HostelRepository, InMemoryHostelRepository, RepositoryError};
use crate::hostel::store::HostelTables;
use crate::hostel::HostelAdmin;

pub(super) type Admin = HostelAdmin<InMemoryHostelRepository>;

pub(super) fn opening_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn build_admin() -> (Admin, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(opening_day()));
    let admin = HostelAdmin::with_clock(Arc::new(InMemoryHostelRepository::new()), clock.clone());
    (admin, clock)
}

pub(super) fn student(admin: &Admin, username: &str) -> (CustomUser, StudentProfile) {
    let mut draft = NewUser::new(username, UserRole::Student);
    draft.first_name = "Nadia".to_string();
    draft.last_name = "Rahman".to_string();
    let user = admin.create_user(draft).expect("student account created");
    let profile = admin
        .profile_for_user(user.id)
        .expect("placeholder profile created");
    (user, profile)
}

pub(super) fn warden(admin: &Admin, username: &str) -> CustomUser {
    let mut draft = NewUser::new(username, UserRole::Provost);
    draft.is_staff = true;
    admin.create_user(draft).expect("warden account created")
}

pub(super) fn room(admin: &Admin, number: &str, capacity: u32) -> Room {
    let mut draft = NewRoom::new(number, 1);
    draft.capacity = capacity;
    admin.create_room(draft).expect("room created")
}

pub(super) fn tables(admin: &Admin) -> HostelTables {
    admin
        .repository()
        .read(|tables| tables.clone())
        .expect("tables readable")
}

/// Repository whose storage is always down.
pub(super) struct OfflineRepository;

impl HostelRepository for OfflineRepository {
    fn read<T, F>(&self, _view: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&HostelTables) -> T,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn write<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&mut HostelTables) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }
}

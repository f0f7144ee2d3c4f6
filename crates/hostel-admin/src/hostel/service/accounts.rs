use serde::Deserialize;
use tracing::info;

use super::{cascade, ensure_unique, fetch, fetch_mut, HostelAdmin, ServiceError};
use crate::hostel::domain::{
    CustomUser, NewStudentProfile, NewUser, ProfileId, StudentProfile, StudentProfilePatch,
    UserId, UserPatch, UserRole,
};
use crate::hostel::query::{matches, matches_search, Page, PageRequest};
use crate::hostel::repository::HostelRepository;
use crate::hostel::signals;

/// Changelist filters for accounts. Search covers username, names and email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFilter {
    pub user_type: Option<UserRole>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

/// Changelist filters for student profiles. Search covers the student id and the owning
/// account's username and names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentFilter {
    pub department: Option<String>,
    pub faculty: Option<String>,
    pub academic_year: Option<u32>,
    pub is_allocated: Option<bool>,
    pub search: Option<String>,
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    /// Creates an account. Student accounts get a placeholder profile in the same write.
    pub fn create_user(&self, draft: NewUser) -> Result<CustomUser, ServiceError> {
        let now = self.now();
        let today = now.date_naive();

        let (user, profile) = self.repository.write(|tables| {
            let user = tables
                .users
                .insert_with(|id| draft.into_record(id, now));
            user.validate()?;
            ensure_unique(&tables.users, user.id, "username", &user.username, |row| {
                row.username.as_str()
            })?;
            let profile = signals::user_saved(tables, &user, true, today)?;
            Ok::<_, ServiceError>((user, profile))
        })?;

        info!(
            user_id = %user.id,
            username = %user.username,
            role = user.user_type.value(),
            profile_created = profile.is_some(),
            "user created"
        );
        Ok(user)
    }

    pub fn update_user(&self, id: UserId, patch: UserPatch) -> Result<CustomUser, ServiceError> {
        let now = self.now();
        let today = now.date_naive();

        self.repository.write(|tables| {
            let user = fetch_mut(&mut tables.users, id)?;
            patch.apply(user, now);
            let user = user.clone();
            user.validate()?;
            ensure_unique(&tables.users, user.id, "username", &user.username, |row| {
                row.username.as_str()
            })?;
            signals::user_saved(tables, &user, false, today)?;
            Ok(user)
        })
    }

    pub fn get_user(&self, id: UserId) -> Result<CustomUser, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.users, id).cloned())?
    }

    pub fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<CustomUser>, ServiceError> {
        let rows = self.repository.read(|tables| {
            tables
                .users
                .iter()
                .filter(|user| {
                    matches(filter.user_type, user.user_type)
                        && matches(filter.is_staff, user.is_staff)
                        && matches(filter.is_active, user.is_active)
                        && matches_search(
                            filter.search.as_deref(),
                            &[
                                user.username.as_str(),
                                user.first_name.as_str(),
                                user.last_name.as_str(),
                                user.email.as_str(),
                            ],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    /// Deletes an account along with its profile and everything it owns.
    pub fn delete_user(&self, id: UserId) -> Result<CustomUser, ServiceError> {
        let user = self.repository.write(|tables| {
            let user = fetch(&tables.users, id)?.clone();
            cascade::remove_user(tables, id);
            Ok::<_, ServiceError>(user)
        })?;
        info!(user_id = %id, username = %user.username, "user deleted");
        Ok(user)
    }

    pub fn profile_for_user(&self, user: UserId) -> Result<StudentProfile, ServiceError> {
        self.repository.read(|tables| {
            fetch(&tables.users, user)?;
            tables
                .student_profiles
                .find(|profile| profile.user == user)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound {
                    model: "student profile",
                    key: format!("for user {user}"),
                })
        })?
    }

    pub fn create_student_profile(
        &self,
        draft: NewStudentProfile,
    ) -> Result<StudentProfile, ServiceError> {
        let today = self.clock.today();

        let profile = self.repository.write(|tables| {
            fetch(&tables.users, draft.user)?;
            if tables
                .student_profiles
                .find(|profile| profile.user == draft.user)
                .is_some()
            {
                return Err(ServiceError::Conflict(format!(
                    "user {} already has a student profile",
                    draft.user
                )));
            }
            let profile = tables
                .student_profiles
                .insert_with(|id| draft.into_record(id, today));
            profile.validate()?;
            ensure_unique(
                &tables.student_profiles,
                profile.id,
                "student_id",
                &profile.student_id,
                |row| row.student_id.as_str(),
            )?;
            Ok(profile)
        })?;

        info!(profile_id = %profile.id, student_id = %profile.student_id, "student profile created");
        Ok(profile)
    }

    pub fn update_student_profile(
        &self,
        id: ProfileId,
        patch: StudentProfilePatch,
    ) -> Result<StudentProfile, ServiceError> {
        self.repository.write(|tables| {
            let profile = fetch_mut(&mut tables.student_profiles, id)?;
            patch.apply(profile);
            let profile = profile.clone();
            profile.validate()?;
            ensure_unique(
                &tables.student_profiles,
                profile.id,
                "student_id",
                &profile.student_id,
                |row| row.student_id.as_str(),
            )?;
            Ok(profile)
        })
    }

    pub fn get_student_profile(&self, id: ProfileId) -> Result<StudentProfile, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.student_profiles, id).cloned())?
    }

    /// Profiles ordered by student id.
    pub fn list_student_profiles(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<Page<StudentProfile>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .student_profiles
                .iter()
                .filter(|profile| {
                    let owner = tables.users.get(profile.user);
                    let (username, first_name, last_name) = owner
                        .map(|user| {
                            (
                                user.username.as_str(),
                                user.first_name.as_str(),
                                user.last_name.as_str(),
                            )
                        })
                        .unwrap_or_default();
                    matches(filter.department.as_deref(), profile.department.as_str())
                        && matches(filter.faculty.as_deref(), profile.faculty.as_str())
                        && matches(filter.academic_year, profile.academic_year)
                        && matches(filter.is_allocated, profile.is_allocated)
                        && matches_search(
                            filter.search.as_deref(),
                            &[profile.student_id.as_str(), username, first_name, last_name],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| a.student_id.cmp(&b.student_id).then(a.id.cmp(&b.id)));
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    /// Deletes a profile with its applications, allocation, complaints, stipends and reports.
    pub fn delete_student_profile(&self, id: ProfileId) -> Result<StudentProfile, ServiceError> {
        let profile = self.repository.write(|tables| {
            let profile = fetch(&tables.student_profiles, id)?.clone();
            cascade::remove_profile(tables, id);
            Ok::<_, ServiceError>(profile)
        })?;
        info!(profile_id = %id, student_id = %profile.student_id, "student profile deleted");
        Ok(profile)
    }
}

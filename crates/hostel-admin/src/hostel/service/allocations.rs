use serde::Deserialize;
use tracing::info;

use super::{cascade, fetch, fetch_mut, HostelAdmin, ServiceError};
use crate::hostel::domain::{
    AllocationId, ApplicationDecision, ApplicationId, ApplicationStatus, NewRoomAllocation,
    NewRoomApplication, ProfileId, RoomAllocation, RoomApplication, RoomId,
};
use crate::hostel::query::{matches, Page, PageRequest};
use crate::hostel::repository::HostelRepository;
use crate::hostel::store::HostelTables;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub student: Option<ProfileId>,
    pub room: Option<RoomId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AllocationFilter {
    pub room: Option<RoomId>,
    pub student: Option<ProfileId>,
    pub is_active: Option<bool>,
}

/// One application per (student, room, status).
fn ensure_distinct_application(
    tables: &HostelTables,
    owner: ApplicationId,
    student: ProfileId,
    room: RoomId,
    status: ApplicationStatus,
) -> Result<(), ServiceError> {
    let taken = tables.room_applications.iter().any(|application| {
        application.id != owner
            && application.student == student
            && application.room == room
            && application.status == status
    });
    if taken {
        Err(ServiceError::Conflict(format!(
            "room application with this student, room and status ({}) already exists",
            status.value()
        )))
    } else {
        Ok(())
    }
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    pub fn submit_application(
        &self,
        draft: NewRoomApplication,
    ) -> Result<RoomApplication, ServiceError> {
        let now = self.now();
        let application = self.repository.write(|tables| {
            fetch(&tables.student_profiles, draft.student)?;
            fetch(&tables.rooms, draft.room)?;
            ensure_distinct_application(
                tables,
                tables.room_applications.peek_next_id(),
                draft.student,
                draft.room,
                ApplicationStatus::Pending,
            )?;
            let application = tables.room_applications.insert_with(|id| RoomApplication {
                id,
                student: draft.student,
                room: draft.room,
                application_date: now,
                preferred_move_date: draft.preferred_move_date,
                status: ApplicationStatus::Pending,
                priority_score: draft.priority_score,
                reason: draft.reason,
                remarks: String::new(),
                processed_by: None,
                processed_at: None,
            });
            Ok::<_, ServiceError>(application)
        })?;

        info!(
            application_id = %application.id,
            student = %application.student,
            room = %application.room,
            "room application submitted"
        );
        Ok(application)
    }

    /// Records a staff verdict. Allocated applications are final, and only an
    /// allocation can move an application to `allocated`.
    pub fn decide_application(
        &self,
        id: ApplicationId,
        decision: ApplicationDecision,
    ) -> Result<RoomApplication, ServiceError> {
        let now = self.now();
        let application = self.repository.write(|tables| {
            fetch(&tables.users, decision.processed_by)?;
            let current = fetch(&tables.room_applications, id)?;
            if current.status == ApplicationStatus::Allocated {
                return Err(ServiceError::Rejected(format!(
                    "application {id} has already been allocated"
                )));
            }
            if decision.status == ApplicationStatus::Allocated {
                return Err(ServiceError::Rejected(
                    "applications are marked allocated by allocating the room".to_string(),
                ));
            }
            ensure_distinct_application(
                tables,
                id,
                current.student,
                current.room,
                decision.status,
            )?;

            let application = fetch_mut(&mut tables.room_applications, id)?;
            application.status = decision.status;
            application.processed_by = Some(decision.processed_by);
            application.processed_at = Some(now);
            if let Some(remarks) = decision.remarks {
                application.remarks = remarks;
            }
            Ok::<_, ServiceError>(application.clone())
        })?;

        info!(
            application_id = %id,
            status = application.status.value(),
            "room application decided"
        );
        Ok(application)
    }

    pub fn get_application(&self, id: ApplicationId) -> Result<RoomApplication, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.room_applications, id).cloned())?
    }

    /// Newest applications first.
    pub fn list_applications(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<Page<RoomApplication>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .room_applications
                .iter()
                .filter(|application| {
                    matches(filter.status, application.status)
                        && matches(filter.student, application.student)
                        && matches(filter.room, application.room)
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| {
            b.application_date
                .cmp(&a.application_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    pub fn delete_application(&self, id: ApplicationId) -> Result<RoomApplication, ServiceError> {
        self.repository.write(|tables| {
            tables
                .room_applications
                .remove(id)
                .ok_or_else(|| ServiceError::not_found::<RoomApplication>(id))
        })
    }

    /// Places a student in a room, taking one bed and flagging the profile as allocated.
    pub fn allocate_room(&self, draft: NewRoomAllocation) -> Result<RoomAllocation, ServiceError> {
        let now = self.now();
        let allocation = self.repository.write(|tables| {
            fetch(&tables.users, draft.allocated_by)?;
            let student = fetch(&tables.student_profiles, draft.student)?;
            let room = fetch(&tables.rooms, draft.room)?;

            if tables
                .room_allocations
                .find(|allocation| allocation.student == draft.student)
                .is_some()
            {
                return Err(ServiceError::Conflict(format!(
                    "student {} already has a room allocation",
                    student.student_id
                )));
            }
            if !room.is_available {
                return Err(ServiceError::Rejected(format!(
                    "room {} is not available",
                    room.room_number
                )));
            }
            if room.is_full() {
                return Err(ServiceError::Rejected(format!(
                    "room {} is full",
                    room.room_number
                )));
            }

            if let Some(application_id) = draft.application {
                let application = fetch_mut(&mut tables.room_applications, application_id)?;
                if application.student != draft.student || application.room != draft.room {
                    return Err(ServiceError::Rejected(format!(
                        "application {application_id} is for a different student or room"
                    )));
                }
                if !matches!(
                    application.status,
                    ApplicationStatus::Pending | ApplicationStatus::Approved
                ) {
                    return Err(ServiceError::Rejected(format!(
                        "application {application_id} is {}",
                        application.status.value()
                    )));
                }
                application.status = ApplicationStatus::Allocated;
                application.processed_by = Some(draft.allocated_by);
                application.processed_at = Some(now);
                ensure_distinct_application(
                    tables,
                    application_id,
                    draft.student,
                    draft.room,
                    ApplicationStatus::Allocated,
                )?;
            }

            if let Some(room) = tables.rooms.get_mut(draft.room) {
                room.current_occupancy += 1;
            }
            if let Some(profile) = tables.student_profiles.get_mut(draft.student) {
                profile.is_allocated = true;
            }

            let allocation = tables.room_allocations.insert_with(|id| RoomAllocation {
                id,
                student: draft.student,
                room: draft.room,
                allocated_date: now,
                allocated_by: draft.allocated_by,
                is_active: true,
                notes: draft.notes,
            });
            Ok::<_, ServiceError>(allocation)
        })?;

        info!(
            allocation_id = %allocation.id,
            student = %allocation.student,
            room = %allocation.room,
            "room allocated"
        );
        Ok(allocation)
    }

    /// Ends an allocation, returning the bed to the room. The fulfilled application stays
    /// `allocated` and gets a remark recording the release.
    pub fn release_allocation(&self, id: AllocationId) -> Result<RoomAllocation, ServiceError> {
        let now = self.now();
        let allocation = self.repository.write(|tables| {
            let allocation = tables
                .room_allocations
                .remove(id)
                .ok_or_else(|| ServiceError::not_found::<RoomAllocation>(id))?;
            cascade::vacate(tables, &allocation);

            let note = format!("Allocation released on {}.", now.date_naive());
            for application in tables.room_applications.iter_mut().filter(|application| {
                application.student == allocation.student
                    && application.room == allocation.room
                    && application.status == ApplicationStatus::Allocated
            }) {
                if !application.remarks.is_empty() {
                    application.remarks.push('\n');
                }
                application.remarks.push_str(&note);
            }
            Ok::<_, ServiceError>(allocation)
        })?;
        info!(allocation_id = %id, room = %allocation.room, "room allocation released");
        Ok(allocation)
    }

    pub fn get_allocation(&self, id: AllocationId) -> Result<RoomAllocation, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.room_allocations, id).cloned())?
    }

    /// Most recent placements first.
    pub fn list_allocations(
        &self,
        filter: &AllocationFilter,
        page: PageRequest,
    ) -> Result<Page<RoomAllocation>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .room_allocations
                .iter()
                .filter(|allocation| {
                    matches(filter.room, allocation.room)
                        && matches(filter.student, allocation.student)
                        && matches(filter.is_active, allocation.is_active)
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| {
            b.allocated_date
                .cmp(&a.allocated_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(Page::paginate(rows, page, self.list_per_page))
    }
}

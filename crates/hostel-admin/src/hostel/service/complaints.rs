use serde::Deserialize;
use tracing::info;

use super::{fetch, fetch_mut, HostelAdmin, ServiceError};
use crate::hostel::domain::{
    next_ticket, ticket_day_prefix, Complaint, ComplaintCategory, ComplaintId, ComplaintPatch,
    ComplaintStatus, NewComplaint, Priority, ProfileId, UserId,
};
use crate::hostel::query::{matches, matches_search, Page, PageRequest};
use crate::hostel::repository::HostelRepository;

/// Changelist filters for complaints. Search covers ticket, subject and location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
    pub priority: Option<Priority>,
    pub student: Option<ProfileId>,
    pub assigned_to: Option<UserId>,
    pub search: Option<String>,
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    /// Files a complaint and issues its `CMP-YYYYMMDD-NNNN` ticket in the same write.
    pub fn file_complaint(&self, draft: NewComplaint) -> Result<Complaint, ServiceError> {
        let now = self.now();
        let today = now.date_naive();

        let complaint = self.repository.write(|tables| {
            fetch(&tables.student_profiles, draft.student)?;
            let prefix = ticket_day_prefix(today);
            let ticket = next_ticket(
                today,
                tables
                    .complaints
                    .iter()
                    .filter(|complaint| complaint.complaint_id.starts_with(&prefix))
                    .map(|complaint| complaint.id),
            );
            let complaint = tables
                .complaints
                .insert_with(|id| draft.into_record(id, ticket, now));
            complaint.validate()?;
            Ok::<_, ServiceError>(complaint)
        })?;

        info!(
            complaint = %complaint.complaint_id,
            student = %complaint.student,
            category = complaint.category.value(),
            "complaint filed"
        );
        Ok(complaint)
    }

    /// Staff update. Resolving or closing stamps `resolved_at`; reopening clears it.
    pub fn update_complaint(
        &self,
        id: ComplaintId,
        patch: ComplaintPatch,
    ) -> Result<Complaint, ServiceError> {
        let now = self.now();
        let complaint = self.repository.write(|tables| {
            if let Some(Some(assignee)) = patch.assigned_to {
                fetch(&tables.users, assignee)?;
            }
            let complaint = fetch_mut(&mut tables.complaints, id)?;
            patch.apply(complaint, now);
            complaint.validate()?;
            Ok::<_, ServiceError>(complaint.clone())
        })?;

        info!(
            complaint = %complaint.complaint_id,
            status = complaint.status.value(),
            "complaint updated"
        );
        Ok(complaint)
    }

    pub fn get_complaint(&self, id: ComplaintId) -> Result<Complaint, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.complaints, id).cloned())?
    }

    pub fn complaint_by_ticket(&self, ticket: &str) -> Result<Complaint, ServiceError> {
        self.repository.read(|tables| {
            tables
                .complaints
                .find(|complaint| complaint.complaint_id == ticket)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound {
                    model: "complaint",
                    key: ticket.to_string(),
                })
        })?
    }

    /// Latest complaints first.
    pub fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        page: PageRequest,
    ) -> Result<Page<Complaint>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .complaints
                .iter()
                .filter(|complaint| {
                    matches(filter.status, complaint.status)
                        && matches(filter.category, complaint.category)
                        && matches(filter.priority, complaint.priority)
                        && matches(filter.student, complaint.student)
                        && (filter.assigned_to.is_none()
                            || complaint.assigned_to == filter.assigned_to)
                        && matches_search(
                            filter.search.as_deref(),
                            &[
                                complaint.complaint_id.as_str(),
                                complaint.subject.as_str(),
                                complaint.location.as_str(),
                            ],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    pub fn delete_complaint(&self, id: ComplaintId) -> Result<Complaint, ServiceError> {
        let complaint = self.repository.write(|tables| {
            tables
                .complaints
                .remove(id)
                .ok_or_else(|| ServiceError::not_found::<Complaint>(id))
        })?;
        info!(complaint = %complaint.complaint_id, "complaint deleted");
        Ok(complaint)
    }
}

use serde::Serialize;

use super::{HostelAdmin, ServiceError};
use crate::hostel::domain::{
    NoticeAttachment, RoomAllocation, RoomApplication, StipendTransaction, StudentProfile,
};
use crate::hostel::query::Page;
use crate::hostel::repository::HostelRepository;
use crate::hostel::store::HostelTables;

/// Changelist label of a record whose display depends on related rows.
pub trait Describe {
    fn describe(&self, tables: &HostelTables) -> String;
}

/// Record serialized together with its changelist label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labelled<T> {
    #[serde(flatten)]
    pub record: T,
    pub label: String,
}

impl Describe for StudentProfile {
    fn describe(&self, tables: &HostelTables) -> String {
        match tables.users.get(self.user) {
            Some(owner) => self.label(owner),
            None => self.student_id.clone(),
        }
    }
}

impl Describe for RoomApplication {
    fn describe(&self, tables: &HostelTables) -> String {
        match (
            tables.student_profiles.get(self.student),
            tables.rooms.get(self.room),
        ) {
            (Some(student), Some(room)) => self.label(student, room),
            _ => format!("application {} ({})", self.id, self.status.value()),
        }
    }
}

impl Describe for RoomAllocation {
    fn describe(&self, tables: &HostelTables) -> String {
        match (
            tables.student_profiles.get(self.student),
            tables.rooms.get(self.room),
        ) {
            (Some(student), Some(room)) => self.label(student, room),
            _ => format!("allocation {}", self.id),
        }
    }
}

impl Describe for NoticeAttachment {
    fn describe(&self, tables: &HostelTables) -> String {
        match tables.notices.get(self.notice) {
            Some(notice) => self.label(notice),
            None => self.filename.clone(),
        }
    }
}

impl Describe for StipendTransaction {
    fn describe(&self, tables: &HostelTables) -> String {
        match tables.student_profiles.get(self.student) {
            Some(student) => self.label(student),
            None => self.reference_number.clone(),
        }
    }
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    pub fn labelled<T: Describe>(&self, record: T) -> Result<Labelled<T>, ServiceError> {
        let label = self.repository.read(|tables| record.describe(tables))?;
        Ok(Labelled { record, label })
    }

    pub fn labelled_all<T: Describe>(
        &self,
        records: Vec<T>,
    ) -> Result<Vec<Labelled<T>>, ServiceError> {
        let labelled = self.repository.read(|tables| {
            records
                .into_iter()
                .map(|record| Labelled {
                    label: record.describe(tables),
                    record,
                })
                .collect()
        })?;
        Ok(labelled)
    }

    /// Labels every row of a changelist page in one read.
    pub fn labelled_page<T: Describe>(
        &self,
        page: Page<T>,
    ) -> Result<Page<Labelled<T>>, ServiceError> {
        let Page {
            count,
            page,
            per_page,
            num_pages,
            results,
        } = page;
        Ok(Page {
            count,
            page,
            per_page,
            num_pages,
            results: self.labelled_all(results)?,
        })
    }
}

//! Operations the hostel office performs on its records.
//!
//! Every mutating call runs as one repository transaction: validation, uniqueness checks,
//! post-save receivers and cascades either all land or none do.

mod accounts;
mod allocations;
mod cascade;
mod complaints;
mod labels;
mod ledger;
mod notices;
mod rooms;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::AdminConfig;

use super::domain::ValidationErrors;
use super::repository::{HostelRepository, RepositoryError};
use super::store::{Record, Table};

pub use accounts::{StudentFilter, UserFilter};
pub use allocations::{AllocationFilter, ApplicationFilter};
pub use complaints::ComplaintFilter;
pub use labels::{Describe, Labelled};
pub use ledger::{LostItemFilter, StipendFilter};
pub use notices::NoticeFilter;
pub use rooms::{RoomFilter, RoomImportSummary, SkippedRoom, ROOM_LIST_PER_PAGE};

/// Facade over the repository used by the admin site, the CLI and tests.
pub struct HostelAdmin<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    list_per_page: usize,
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            list_per_page: AdminConfig::DEFAULT_LIST_PER_PAGE,
        }
    }

    /// Page size for changelists that do not pick their own.
    pub fn with_list_per_page(mut self, list_per_page: usize) -> Self {
        self.list_per_page = list_per_page.max(1);
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn list_per_page(&self) -> usize {
        self.list_per_page
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Result of an admin bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkActionOutcome {
    pub action: &'static str,
    pub affected: usize,
    pub message: String,
}

/// Error raised by the hostel service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{model} {key} not found")]
    NotFound { model: &'static str, key: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub(crate) fn not_found<T: Record>(id: T::Id) -> Self {
        let key: u64 = id.into();
        Self::NotFound {
            model: T::MODEL,
            key: key.to_string(),
        }
    }
}

pub(crate) fn fetch<T: Record>(table: &Table<T>, id: T::Id) -> Result<&T, ServiceError> {
    table.get(id).ok_or_else(|| ServiceError::not_found::<T>(id))
}

pub(crate) fn fetch_mut<T: Record>(
    table: &mut Table<T>,
    id: T::Id,
) -> Result<&mut T, ServiceError> {
    table
        .get_mut(id)
        .ok_or_else(|| ServiceError::not_found::<T>(id))
}

/// Unique column check; `owner` is the row being saved, which may keep its own value.
pub(crate) fn ensure_unique<T, F>(
    table: &Table<T>,
    owner: T::Id,
    field: &'static str,
    value: &str,
    column: F,
) -> Result<(), ServiceError>
where
    T: Record,
    F: Fn(&T) -> &str,
{
    let taken = table
        .iter()
        .any(|row| row.id() != owner && column(row) == value);
    if taken {
        Err(ServiceError::Conflict(format!(
            "{} with this {} already exists",
            T::MODEL,
            field.replace('_', " ")
        )))
    } else {
        Ok(())
    }
}

//! Hostel records, their bookkeeping rules and the operations the office runs on them.

pub mod domain;
pub mod import;
pub mod query;
pub mod repository;
pub mod service;
mod signals;
pub mod store;

#[cfg(test)]
mod tests;

pub use import::{RejectedRow, RoomCsvImporter, RoomImportError, RoomSheet};
pub use query::{Page, PageRequest};
pub use repository::{
    HostelRepository, InMemoryHostelRepository, JsonFileHostelRepository, RepositoryError,
};
pub use service::{BulkActionOutcome, HostelAdmin, ServiceError};
pub use store::HostelTables;

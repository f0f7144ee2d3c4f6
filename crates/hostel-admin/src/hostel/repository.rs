use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::store::HostelTables;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Writes are transactions: `work` runs against a staged copy of the tables, and the copy
/// replaces the committed state only when `work` succeeds.
pub trait HostelRepository: Send + Sync {
    fn read<T, F>(&self, view: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&HostelTables) -> T;

    fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut HostelTables) -> Result<T, E>,
        E: From<RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("failed to access data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("data file {} is not a valid hostel snapshot: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn lock(tables: &Mutex<HostelTables>) -> Result<MutexGuard<'_, HostelTables>, RepositoryError> {
    tables
        .lock()
        .map_err(|_| RepositoryError::Unavailable("table lock poisoned".to_string()))
}

/// Process-local store; state is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHostelRepository {
    tables: Mutex<HostelTables>,
}

impl InMemoryHostelRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: HostelTables) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }
}

impl HostelRepository for InMemoryHostelRepository {
    fn read<T, F>(&self, view: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&HostelTables) -> T,
    {
        let guard = lock(&self.tables)?;
        Ok(view(&guard))
    }

    fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut HostelTables) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = lock(&self.tables)?;
        let mut staged = guard.clone();
        let value = work(&mut staged)?;
        *guard = staged;
        Ok(value)
    }
}

/// Store that rewrites a JSON snapshot on every committed transaction.
#[derive(Debug)]
pub struct JsonFileHostelRepository {
    path: PathBuf,
    tables: Mutex<HostelTables>,
}

impl JsonFileHostelRepository {
    /// Loads `path` when it exists, otherwise starts empty and creates it on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let tables = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                RepositoryError::Snapshot {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HostelTables::default(),
            Err(source) => return Err(RepositoryError::Io { path, source }),
        };

        info!(path = %path.display(), users = tables.users.len(), rooms = tables.rooms.len(), "hostel snapshot loaded");

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tables: &HostelTables) -> Result<(), RepositoryError> {
        let io_error = |source| RepositoryError::Io {
            path: self.path.clone(),
            source,
        };

        let encoded = serde_json::to_vec_pretty(tables).map_err(|source| {
            RepositoryError::Snapshot {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, encoded).map_err(io_error)?;
        fs::rename(&staging, &self.path).map_err(io_error)?;

        debug!(path = %self.path.display(), "hostel snapshot written");
        Ok(())
    }
}

impl HostelRepository for JsonFileHostelRepository {
    fn read<T, F>(&self, view: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&HostelTables) -> T,
    {
        let guard = lock(&self.tables)?;
        Ok(view(&guard))
    }

    fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut HostelTables) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = lock(&self.tables)?;
        let mut staged = guard.clone();
        let value = work(&mut staged)?;
        self.persist(&staged)?;
        *guard = staged;
        Ok(value)
    }
}

//! Data source collaborator
//!
//! The explorer never fetches data itself. A [`DataSource`] produces fresh
//! snapshots of the collection on demand, and each snapshot is fed to
//! [`Explorer::apply_collection`](crate::Explorer::apply_collection).

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::Record;

/// Produces snapshots of the record collection.
#[async_trait]
pub trait DataSource<R: Record>: Send + Sync {
    /// Fetches the current collection. May be called any number of times.
    async fn fetch_collection(&self) -> Result<Vec<R>, SourceError>;
}

/// A data source backed by an in-memory collection.
///
/// Handy for tests and demos: replace the collection with [`MemorySource::set`]
/// and the next fetch returns it.
#[derive(Debug, Default)]
pub struct MemorySource<R> {
    records: Mutex<Vec<R>>,
}

impl<R: Record> MemorySource<R> {
    /// Creates a source holding `records`.
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Replaces the collection.
    pub fn set(&self, records: Vec<R>) {
        *self.lock() = records;
    }

    // Writers only ever swap the whole vector; a poisoned guard still holds a
    // complete collection.
    fn lock(&self) -> MutexGuard<'_, Vec<R>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<R: Record> DataSource<R> for MemorySource<R> {
    async fn fetch_collection(&self) -> Result<Vec<R>, SourceError> {
        Ok(self.lock().clone())
    }
}

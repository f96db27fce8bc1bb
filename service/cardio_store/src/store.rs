use crate::record::{Assessment, NewAssessment};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Corrupt record {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence for assessment records
pub trait AssessmentStore: Send + Sync {
    /// Store a new record, assigning its id and timestamps
    fn insert(&self, new: NewAssessment) -> Result<Assessment, StoreError>;

    /// A user's records, newest first, at most `limit` of them
    fn find_by_user(&self, user_id: u64, limit: Option<usize>)
        -> Result<Vec<Assessment>, StoreError>;

    /// One record, only if it belongs to `user_id`
    fn find_by_id_and_user(
        &self,
        assessment_id: u64,
        user_id: u64,
    ) -> Result<Option<Assessment>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    records: BTreeMap<u64, Assessment>,
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put back a record read from durable storage, keeping its id
    pub(crate) fn restore(&self, record: Assessment) {
        let mut inner = self.inner.write();
        inner.last_id = inner.last_id.max(record.assessment_id);
        inner.records.insert(record.assessment_id, record);
    }

    /// Assign the next id and build the record without storing it
    pub(crate) fn next_record(&self, new: NewAssessment) -> Assessment {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        new.into_assessment(inner.last_id, Utc::now())
    }
}

impl AssessmentStore for MemoryStore {
    fn insert(&self, new: NewAssessment) -> Result<Assessment, StoreError> {
        let record = self.next_record(new);
        self.restore(record.clone());
        Ok(record)
    }

    fn find_by_user(
        &self,
        user_id: u64,
        limit: Option<usize>,
    ) -> Result<Vec<Assessment>, StoreError> {
        let inner = self.inner.read();
        let mut found: Vec<Assessment> = inner
            .records
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.assessment_id.cmp(&a.assessment_id))
        });
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    fn find_by_id_and_user(
        &self,
        assessment_id: u64,
        user_id: u64,
    ) -> Result<Option<Assessment>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .records
            .get(&assessment_id)
            .filter(|a| a.user_id == user_id)
            .cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().records.len())
    }
}

use std::fs::{create_dir_all, read, read_dir, rename, write};
use std::path::{Path, PathBuf};

use crate::record::{Assessment, NewAssessment};
use crate::store::{AssessmentStore, MemoryStore, StoreError};

const PREFIX: &str = "assessment-";
const SUFFIX: &str = ".json";

/// Directory-backed store: one JSON document per assessment.
///
/// All records are read into memory when the store is opened; inserts are
/// written through to disk before they become visible to readers.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    index: MemoryStore,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let index = MemoryStore::new();
        let entries = read_dir(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut restored = 0usize;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || !is_record_file(&path) {
                continue;
            }
            let data = read(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let record: Assessment = serde_json::from_slice(&data)
                .map_err(|source| StoreError::Corrupt { path, source })?;
            index.restore(record);
            restored += 1;
        }

        log::info!(
            "Opened assessment store at {} ({} records)",
            dir.display(),
            restored
        );
        Ok(Self { dir, index })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, assessment_id: u64) -> PathBuf {
        self.dir.join(format!("{PREFIX}{assessment_id}{SUFFIX}"))
    }

    fn persist(&self, record: &Assessment) -> Result<(), StoreError> {
        let path = self.path_for(record.assessment_id);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(record)?;
        write(&tmp, data).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

fn is_record_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix(PREFIX))
        .and_then(|n| n.strip_suffix(SUFFIX))
        .is_some_and(|id| id.parse::<u64>().is_ok())
}

impl AssessmentStore for FileStore {
    fn insert(&self, new: NewAssessment) -> Result<Assessment, StoreError> {
        let record = self.index.next_record(new);
        self.persist(&record)?;
        self.index.restore(record.clone());
        log::debug!(
            "Stored assessment {} for user {}",
            record.assessment_id,
            record.user_id
        );
        Ok(record)
    }

    fn find_by_user(
        &self,
        user_id: u64,
        limit: Option<usize>,
    ) -> Result<Vec<Assessment>, StoreError> {
        self.index.find_by_user(user_id, limit)
    }

    fn find_by_id_and_user(
        &self,
        assessment_id: u64,
        user_id: u64,
    ) -> Result<Option<Assessment>, StoreError> {
        self.index.find_by_id_and_user(assessment_id, user_id)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.index.count()
    }
}

//! Process-wide holder for the loaded classifier/scaler pair
//!
//! Readers take a cheap `Arc` clone of the current pair and score without
//! holding any lock. Loads are serialized by a separate mutex and publish the
//! new pair with a single swap, so a caller sees either both artifacts of one
//! load or nothing.

use crate::artifact::ArtifactError;
use crate::metadata::ModelVersion;
use crate::source::{ArtifactSource, Artifacts, DirectorySource};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Default)]
struct LoadRecord {
    attempts: u64,
    last_error: Option<String>,
}

/// Snapshot of the loader for health reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderStatus {
    pub loaded: bool,
    /// Artifact location; kept out of serialized output
    #[serde(skip)]
    pub source: String,
    pub loaded_at: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub version: Option<ModelVersion>,
    pub load_attempts: u64,
    pub last_error: Option<String>,
}

pub struct ModelLoader {
    source: Box<dyn ArtifactSource>,
    expected_features: Option<Vec<String>>,
    current: RwLock<Option<Arc<Artifacts>>>,
    reload: Mutex<LoadRecord>,
}

impl ModelLoader {
    /// Create an empty loader. Nothing is read until [`load`](Self::load) or
    /// [`ensure_loaded`](Self::ensure_loaded) is called.
    pub fn new<S: ArtifactSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            expected_features: None,
            current: RwLock::new(None),
            reload: Mutex::new(LoadRecord::default()),
        }
    }

    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(DirectorySource::new(dir))
    }

    /// Require every load to match this feature order
    pub fn with_expected_features(mut self, names: &[&str]) -> Self {
        self.expected_features = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Read both artifacts and publish them together.
    ///
    /// On failure the previously held pair is dropped as well, leaving the
    /// loader empty.
    pub fn load(&self) -> Result<Arc<Artifacts>, ArtifactError> {
        let mut record = self.reload.lock();
        self.load_locked(&mut record)
    }

    /// The currently held pair, if any
    pub fn current(&self) -> Option<Arc<Artifacts>> {
        self.current.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Return the held pair, attempting one reload when nothing is held.
    ///
    /// Concurrent callers that find the loader empty queue on the reload
    /// mutex; the first one reads from disk and the rest pick up its result.
    pub fn ensure_loaded(&self) -> Option<Arc<Artifacts>> {
        if let Some(artifacts) = self.current() {
            return Some(artifacts);
        }

        let mut record = self.reload.lock();
        if let Some(artifacts) = self.current() {
            return Some(artifacts);
        }
        log::warn!(
            "model artifacts not loaded, attempting reload from {}",
            self.source.describe()
        );
        self.load_locked(&mut record).ok()
    }

    pub fn status(&self) -> LoaderStatus {
        let record = self.reload.lock();
        let current = self.current();
        let metadata = current.as_ref().and_then(|a| a.metadata());
        LoaderStatus {
            loaded: current.is_some(),
            source: self.source.describe(),
            loaded_at: current.as_ref().map(|a| a.loaded_at()),
            name: metadata.map(|m| m.name.clone()),
            version: metadata.map(|m| m.version.clone()),
            load_attempts: record.attempts,
            last_error: record.last_error.clone(),
        }
    }

    fn load_locked(&self, record: &mut LoadRecord) -> Result<Arc<Artifacts>, ArtifactError> {
        record.attempts += 1;
        match self.read_source() {
            Ok(artifacts) => {
                let artifacts = Arc::new(artifacts);
                *self.current.write() = Some(Arc::clone(&artifacts));
                record.last_error = None;
                log::info!(
                    "loaded {} classifier and {} scaler ({} features) from {}",
                    artifacts.classifier().kind(),
                    artifacts.scaler().kind(),
                    artifacts.n_features(),
                    self.source.describe()
                );
                Ok(artifacts)
            }
            Err(e) => {
                *self.current.write() = None;
                record.last_error = Some(e.to_string());
                log::error!(
                    "failed to load model artifacts from {}: {e}",
                    self.source.describe()
                );
                Err(e)
            }
        }
    }

    fn read_source(&self) -> Result<Artifacts, ArtifactError> {
        let artifacts = self.source.load()?;
        if let Some(expected) = &self.expected_features {
            let names: Vec<&str> = expected.iter().map(String::as_str).collect();
            artifacts.check_feature_order(&names)?;
        }
        Ok(artifacts)
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

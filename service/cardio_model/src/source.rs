//! Where artifacts come from: the on-disk directory in production, anything
//! implementing [`ArtifactSource`] in tests.

use crate::artifact::{ArtifactError, Classifier, Scaler};
use crate::logistic::ModelArtifact;
use crate::metadata::ArtifactMetadata;
use crate::scaler::ScalerArtifact;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fs::read;
use std::path::{Path, PathBuf};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";

/// A classifier and the scaler it was fit with, always held together
pub struct Artifacts {
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn Scaler>,
    metadata: Option<ArtifactMetadata>,
    loaded_at: DateTime<Utc>,
}

impl Artifacts {
    /// Pair a classifier with its scaler; their input widths must agree
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Box<dyn Scaler>,
    ) -> Result<Self, ArtifactError> {
        if classifier.n_features() != scaler.n_features() {
            return Err(ArtifactError::Invalid(format!(
                "scaler produces {} features but classifier expects {}",
                scaler.n_features(),
                classifier.n_features()
            )));
        }
        Ok(Self {
            classifier,
            scaler,
            metadata: None,
            loaded_at: Utc::now(),
        })
    }

    pub fn with_metadata(mut self, metadata: Option<ArtifactMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn metadata(&self) -> Option<&ArtifactMetadata> {
        self.metadata.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn n_features(&self) -> usize {
        self.classifier.n_features()
    }

    /// Check that both artifacts were fit on `expected` in exactly that order.
    /// Artifacts without recorded names only have their width checked.
    pub fn check_feature_order(&self, expected: &[&str]) -> Result<(), ArtifactError> {
        if self.n_features() != expected.len() {
            return Err(ArtifactError::ShapeMismatch {
                expected: expected.len(),
                actual: self.n_features(),
            });
        }
        let recorded = [
            ("classifier", self.classifier.feature_names()),
            ("scaler", self.scaler.feature_names()),
        ];
        for (which, names) in recorded {
            let Some(names) = names else { continue };
            if let Some(idx) = names
                .iter()
                .zip(expected.iter())
                .position(|(have, want)| have != want)
            {
                return Err(ArtifactError::Invalid(format!(
                    "{which} feature {idx} is '{}', expected '{}'",
                    names[idx], expected[idx]
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("classifier", &self.classifier.kind())
            .field("scaler", &self.scaler.kind())
            .field("n_features", &self.n_features())
            .field("metadata", &self.metadata)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Produces a fresh, fully validated pair of artifacts on every call
pub trait ArtifactSource: Send + Sync {
    fn load(&self) -> Result<Artifacts, ArtifactError>;

    /// Human-readable location, used in log lines
    fn describe(&self) -> String;
}

/// Reads `model.json` and `scaler.json` from one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }
}

impl ArtifactSource for DirectorySource {
    fn load(&self) -> Result<Artifacts, ArtifactError> {
        let model_path = self.model_path();
        let scaler_path = self.scaler_path();

        // Both must exist before either is parsed.
        for path in [&model_path, &scaler_path] {
            if !path.is_file() {
                return Err(ArtifactError::Missing(path.clone()));
            }
        }

        let model: ModelArtifact = read_json(&model_path)?;
        let scaler: ScalerArtifact = read_json(&scaler_path)?;
        let metadata = model.metadata().cloned();

        Ok(Artifacts::new(model.into_classifier()?, scaler.into_scaler()?)?.with_metadata(metadata))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

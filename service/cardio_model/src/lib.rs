//! Trained-model artifacts for the Cardio Care risk service
//!
//! Holds the classifier and feature-scaler abstractions, their JSON artifact
//! formats, and the loader that keeps both in memory as one shared unit.

pub mod artifact;
pub mod logistic;
pub mod metadata;
pub mod scaler;
pub mod source;
pub mod loader;

pub use artifact::{ArtifactError, ClassProbabilities, Classifier, Scaler};
pub use loader::{LoaderStatus, ModelLoader};
pub use logistic::{LogisticRegression, ModelArtifact};
pub use metadata::{ArtifactMetadata, ModelVersion};
pub use scaler::{MinMaxScaler, ScalerArtifact, StandardScaler};
pub use source::{ArtifactSource, Artifacts, DirectorySource, MODEL_FILE, SCALER_FILE};

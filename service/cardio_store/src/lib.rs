//! Assessment records and their storage.
//!
//! Records are keyed by user and returned newest first. Two stores are
//! provided: [`MemoryStore`] for tests and throwaway runs, and [`FileStore`],
//! which keeps one JSON document per assessment in a directory.
//!
//! ```
//! use cardio_risk::{FallbackReason, RiskVerdict};
//! use cardio_store::{dashboard_stats, AssessmentStore, MemoryStore, NewAssessment};
//!
//! let store = MemoryStore::new();
//! let data = serde_json::json!({ "age": 61 }).as_object().cloned().unwrap();
//! store
//!     .insert(NewAssessment::new(7, data, Some(RiskVerdict::from_scores(0.8, 0.8))))
//!     .unwrap();
//! store
//!     .insert(NewAssessment::new(7, Default::default(), Some(RiskVerdict::fallback(FallbackReason::ModelUnavailable))))
//!     .unwrap();
//!
//! let mine = store.find_by_user(7, None).unwrap();
//! let stats = dashboard_stats(&mine);
//! assert_eq!(stats.total_assessments, 2);
//! assert_eq!(stats.risk_trend, vec![0.3, 0.8]);
//! ```

pub mod file;
pub mod record;
pub mod stats;
pub mod store;

pub use file::FileStore;
pub use record::{Assessment, NewAssessment};
pub use stats::{dashboard_stats, DashboardStats, RISK_TREND_LEN};
pub use store::{AssessmentStore, MemoryStore, StoreError};

//! Shared domain model, traits, and error types for the artist release pipeline.
//!
//! This crate has no async runtime dependency of its own beyond what is
//! needed to declare trait signatures; it is imported by every other
//! crate in the workspace as the common vocabulary.

pub mod error;
pub mod persona;
pub mod release;
pub mod metric;
pub mod source_stats;
pub mod progression;
pub mod run_status;
pub mod settings;
pub mod fsutil;
pub mod traits;

pub use error::{Error, Result};
pub use persona::{Persona, PersonaId, PersonaMutationToken};
pub use release::{Release, ReleaseId, ReleaseStatus};
pub use metric::{MetricType, PerformanceMetric};
pub use source_stats::{ClipMetricRecord, ClipStats, SourceStats};
pub use progression::{ProgressionAction, ProgressionEntry};
pub use run_status::{RunState, RunStatus};
pub use settings::Settings;

//! Collaborator traits for the external systems the pipeline depends on.
//!
//! Every module in this workspace that calls out to an LLM provider, a
//! browser, a human approver, or an analytics source does so through one
//! of these traits, never against a concrete client type. Production
//! wires real adapters; tests wire mocks.

mod provider;
mod validator;
mod browser;
mod approval;
mod metrics_source;
mod notification;
mod audio;
mod clip_source;

pub use provider::{ProviderAdapter, ProviderCallError, ProviderRequest, ProviderResponse};
pub use validator::{ValidationOutcome, VisionValidator};
pub use browser::{BrowserAction, BrowserDriver, BrowserObservation};
pub use approval::{ApprovalChannel, ApprovalDecision};
pub use metrics_source::MetricsSource;
pub use notification::NotificationSink;
pub use audio::{AudioFeatureSource, AudioFeatures};
pub use clip_source::{StockClip, StockClipSource};

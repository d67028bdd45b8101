//! Stock video source trait: a provider (e.g. Pexels) that can be
//! searched for candidate clips by query string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockClip {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub duration_secs: f32,
    pub download_link: Option<String>,
}

#[async_trait]
pub trait StockClipSource: Send + Sync + 'static {
    /// Stable identifier, e.g. `"pexels"`, matched against
    /// `SourceStats`'s source names.
    fn name(&self) -> &str;

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<StockClip>>;
}

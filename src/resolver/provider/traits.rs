use crate::resolver::{
    Result,
    types::{CanonicalMedia, ProviderCandidate, SearchFilters},
};
use async_trait::async_trait;

/// Authoritative metadata source
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Catalog identifier (e.g., "anilist")
    fn id(&self) -> &'static str;

    /// Fetch a record by catalog id, `None` when the id is unknown
    async fn get_media(&self, id: i64) -> Result<Option<CanonicalMedia>>;
}

/// Third-party content index with its own search and episode listing
#[async_trait]
pub trait StreamingProvider: Send + Sync {
    /// Provider identifier, used in cache keys
    fn id(&self) -> &str;

    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Free-text search with best-effort filters
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<ProviderCandidate>>;

    /// Raw JSON of one episode listing page (1-based)
    async fn episode_page(&self, provider_id: &str, page: u32) -> Result<serde_json::Value>;
}

mod batch;
mod cache;
mod episodes;
mod lenient;
mod manager;
mod matcher;
mod provider;
mod retry;
mod search;
mod title;
mod types;


pub use batch::for_each_batch;
pub use cache::{MokaResolutionCache, ResolutionCache};
pub use episodes::{EpisodeDecoder, EpisodeFetcher, FetcherConfig, RawPage, ShapeMatcher};
pub use manager::{ManagerConfig, ResolverManager};
pub use matcher::{MIN_ACCEPT_SCORE, Matcher, ScoreBreakdown, ScoredCandidate};
pub use provider::{
    ANILIST_API_URL, AniListCatalog, CatalogProvider, HttpClient, JsonApiProvider, ProviderEndpoint,
    StreamingProvider,
};
pub use retry::{RetryPolicy, with_retry};
pub use search::{ResolvedProvider, SearchOrchestrator, SearchStrategy};
pub use title::{detect_season, extract_base_title, normalize_title, similarity};
pub use types::{
    CanonicalMedia, EpisodePage, EpisodeRecord, MatchResult, MediaFormat, MediaRelation,
    MediaStatus, MediaTitles, ProviderCandidate, RelatedNode, RelationType, SearchFilters,
};

use crate::config::AppConfig;
use std::sync::Arc;

/// Resolver result type
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Resolver error types
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Page {page} failed after {attempts} attempts")]
    PageFetchExhausted { page: u32, attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolverError {
    /// Transport failure or non-2xx answer from a collaborator
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. })
    }
}

/// Create a manager wired with the AniList catalog and every configured provider
pub fn create_default_manager(config: &AppConfig) -> Result<ResolverManager> {
    config.validate()?;

    let catalog = AniListCatalog::with_base_url(
        &config.catalog.base_url,
        config.catalog.timeout_secs,
    )?;
    let cache = MokaResolutionCache::new(config.cache.max_entries);

    let mut manager = ResolverManager::new(
        Arc::new(catalog),
        Arc::new(cache),
        ManagerConfig::from(config),
    );

    for endpoint in &config.providers {
        manager.add_provider(JsonApiProvider::new(endpoint.clone())?);
    }

    Ok(manager)
}

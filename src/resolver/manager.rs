use crate::config::AppConfig;
use crate::resolver::{
    Result, ResolverError,
    cache::ResolutionCache,
    episodes::{EpisodeFetcher, FetcherConfig},
    matcher::MIN_ACCEPT_SCORE,
    provider::{CatalogProvider, StreamingProvider},
    retry::RetryPolicy,
    search::{ResolvedProvider, SearchOrchestrator},
    types::{CanonicalMedia, EpisodeRecord, MediaStatus},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolver manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub min_score: f64,
    pub max_synonyms: usize,
    pub search_retry: RetryPolicy,
    pub fetcher: FetcherConfig,
    pub resolution_ttl: Duration,
    pub ongoing_episodes_ttl: Duration,
    pub finished_episodes_ttl: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            min_score: MIN_ACCEPT_SCORE,
            max_synonyms: 3,
            search_retry: RetryPolicy::none(),
            fetcher: FetcherConfig::default(),
            resolution_ttl: Duration::from_secs(7 * 86400),
            ongoing_episodes_ttl: Duration::from_secs(3600),
            finished_episodes_ttl: Duration::from_secs(86400),
        }
    }
}

impl From<&AppConfig> for ManagerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_score: config.matching.min_score,
            max_synonyms: config.matching.max_synonyms,
            search_retry: RetryPolicy::new(config.matching.search_retries, Duration::from_secs(1)),
            fetcher: FetcherConfig {
                batch_size: config.episodes.batch_size,
                retry: RetryPolicy::new(
                    config.episodes.max_retries,
                    Duration::from_millis(config.episodes.base_delay_ms),
                ),
            },
            resolution_ttl: Duration::from_secs(config.cache.resolution_ttl_secs),
            ongoing_episodes_ttl: Duration::from_secs(config.cache.ongoing_episodes_ttl_secs),
            finished_episodes_ttl: Duration::from_secs(config.cache.finished_episodes_ttl_secs),
        }
    }
}

/// Composes the catalog, the providers and the cache around the stateless engine
pub struct ResolverManager {
    catalog: Arc<dyn CatalogProvider>,
    providers: Vec<Arc<dyn StreamingProvider>>,
    cache: Arc<dyn ResolutionCache>,
    config: ManagerConfig,
}

impl ResolverManager {
    /// Create a manager without providers
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        cache: Arc<dyn ResolutionCache>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            catalog,
            providers: Vec::new(),
            cache,
            config,
        }
    }

    /// Add a provider
    pub fn add_provider<P: StreamingProvider + 'static>(&mut self, provider: P) {
        self.providers.push(Arc::new(provider));
    }

    /// Get all providers
    pub fn providers(&self) -> &[Arc<dyn StreamingProvider>] {
        &self.providers
    }

    /// Find a provider by id
    pub fn provider(&self, id: &str) -> Result<&Arc<dyn StreamingProvider>> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| ResolverError::Config(format!("Provider not found: {id}")))
    }

    /// Search orchestrator for one provider
    pub fn orchestrator(&self, provider: &Arc<dyn StreamingProvider>) -> SearchOrchestrator {
        SearchOrchestrator::new(Arc::clone(provider))
            .with_min_score(self.config.min_score)
            .with_max_synonyms(self.config.max_synonyms)
            .with_retry(self.config.search_retry)
    }

    /// Episode fetcher for one provider
    pub fn fetcher(&self, provider: &Arc<dyn StreamingProvider>) -> EpisodeFetcher {
        EpisodeFetcher::with_config(Arc::clone(provider), self.config.fetcher)
    }

    /// Resolve a catalog id on a provider.
    ///
    /// Catalog failures abort; `Ok(None)` means no candidate was accepted.
    pub async fn resolve(
        &self,
        canonical_id: i64,
        provider_id: &str,
    ) -> Result<Option<ResolvedProvider>> {
        let provider = self.provider(provider_id)?;
        let key = resolution_key(canonical_id, provider.id());

        if let Some(cached) = self.cached::<ResolvedProvider>(&key).await {
            debug!("Cache hit for resolution: {}", key);
            return Ok(Some(cached));
        }

        let media = self.catalog.get_media(canonical_id).await?.ok_or_else(|| {
            ResolverError::NotFound(format!(
                "{} has no media with id {canonical_id}",
                self.catalog.id()
            ))
        })?;

        Ok(self.resolve_and_store(&media, provider, &key).await)
    }

    /// Resolve an already fetched catalog record on a provider
    pub async fn resolve_media(
        &self,
        media: &CanonicalMedia,
        provider_id: &str,
    ) -> Result<Option<ResolvedProvider>> {
        let provider = self.provider(provider_id)?;
        let key = resolution_key(media.id, provider.id());

        if let Some(cached) = self.cached::<ResolvedProvider>(&key).await {
            debug!("Cache hit for resolution: {}", key);
            return Ok(Some(cached));
        }

        Ok(self.resolve_and_store(media, provider, &key).await)
    }

    /// Resolve and fetch the episode list; `Ok(None)` when nothing matched
    pub async fn episodes(
        &self,
        canonical_id: i64,
        provider_id: &str,
    ) -> Result<Option<Vec<EpisodeRecord>>> {
        let Some(resolved) = self.resolve(canonical_id, provider_id).await? else {
            return Ok(None);
        };

        let provider = self.provider(provider_id)?;
        let key = episodes_key(canonical_id, provider.id());

        if let Some(cached) = self.cached::<Vec<EpisodeRecord>>(&key).await {
            debug!("Cache hit for episodes: {}", key);
            return Ok(Some(cached));
        }

        let episodes = self
            .fetcher(provider)
            .fetch_all_episodes(&resolved.provider_id, resolved.known_episode_count)
            .await;

        if !episodes.is_empty() {
            let ttl = self.episodes_ttl(resolved.status);
            self.store(&key, &episodes, ttl).await;
        }

        Ok(Some(episodes))
    }

    /// Drop cached resolution and episodes for a catalog id on a provider
    pub async fn invalidate(&self, canonical_id: i64, provider_id: &str) {
        self.cache
            .invalidate(&resolution_key(canonical_id, provider_id))
            .await;
        self.cache
            .invalidate(&episodes_key(canonical_id, provider_id))
            .await;
    }

    async fn resolve_and_store(
        &self,
        media: &CanonicalMedia,
        provider: &Arc<dyn StreamingProvider>,
        key: &str,
    ) -> Option<ResolvedProvider> {
        let resolved = self.orchestrator(provider).resolve(media).await?;
        self.store(key, &resolved, self.config.resolution_ttl).await;
        info!("Cached resolution {} -> {}", key, resolved.provider_id);
        Some(resolved)
    }

    const fn episodes_ttl(&self, status: MediaStatus) -> Duration {
        match status {
            MediaStatus::Finished => self.config.finished_episodes_ttl,
            MediaStatus::Ongoing | MediaStatus::Unreleased => self.config.ongoing_episodes_ttl,
        }
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                self.cache.invalidate(key).await;
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_string(value) {
            Ok(raw) => self.cache.set(key, raw, ttl).await,
            Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }
}

fn resolution_key(canonical_id: i64, provider: &str) -> String {
    format!("{canonical_id}:{provider}")
}

fn episodes_key(canonical_id: i64, provider: &str) -> String {
    format!("episodes:{canonical_id}:{provider}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(resolution_key(154587, "pahe"), "154587:pahe");
        assert_eq!(episodes_key(154587, "pahe"), "episodes:154587:pahe");
    }

    #[test]
    fn test_config_from_app_config() {
        let mut app = AppConfig::default();
        app.episodes.batch_size = 8;
        app.episodes.base_delay_ms = 250;
        app.matching.min_score = 90.0;

        let config = ManagerConfig::from(&app);
        assert_eq!(config.fetcher.batch_size, 8);
        assert_eq!(config.fetcher.retry.max_attempts(), 4);
        assert_eq!(config.fetcher.retry.base_delay, Duration::from_millis(250));
        assert_eq!(config.min_score, 90.0);
        assert_eq!(config.search_retry, RetryPolicy::new(0, Duration::from_secs(1)));
    }
}

mod decoder;

pub use decoder::{EpisodeDecoder, RawPage, ShapeMatcher};

use crate::resolver::{
    ResolverError,
    batch::for_each_batch,
    provider::StreamingProvider,
    retry::{RetryPolicy, with_retry},
    types::{EpisodePage, EpisodeRecord},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Episode fetcher configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Pages requested concurrently per batch
    pub batch_size: usize,
    /// Per-page retry policy
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            retry: RetryPolicy::default(),
        }
    }
}

/// Retrieves every page of a provider's episode listing
pub struct EpisodeFetcher {
    provider: Arc<dyn StreamingProvider>,
    decoder: EpisodeDecoder,
    config: FetcherConfig,
}

impl EpisodeFetcher {
    pub fn new(provider: Arc<dyn StreamingProvider>) -> Self {
        Self::with_config(provider, FetcherConfig::default())
    }

    pub fn with_config(provider: Arc<dyn StreamingProvider>, config: FetcherConfig) -> Self {
        Self {
            provider,
            decoder: EpisodeDecoder::new(),
            config,
        }
    }

    /// Builder pattern: replace the listing decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: EpisodeDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Fetch the complete episode list, sorted by number.
    ///
    /// Pages that keep failing contribute nothing; the result may then hold
    /// fewer episodes than the provider reports.
    pub async fn fetch_all_episodes(
        &self,
        provider_id: &str,
        known_total: Option<u32>,
    ) -> Vec<EpisodeRecord> {
        let Some(first) = self.fetch_page(provider_id, 1).await else {
            return Vec::new();
        };

        let total_pages = total_pages(&first, known_total);
        let mut episodes = first.episodes;

        if total_pages > 1 {
            debug!(
                "{} on {} spans {} pages, fetching in batches of {}",
                provider_id,
                self.provider.id(),
                total_pages,
                self.config.batch_size
            );

            let pages: Vec<u32> = (2..=total_pages).collect();
            let results = for_each_batch(pages, self.config.batch_size, |page| {
                self.fetch_page(provider_id, page)
            })
            .await;

            for page in results.into_iter().flatten() {
                episodes.extend(page.episodes);
            }
        }

        episodes.sort_by_key(|e| e.number);
        episodes.dedup_by_key(|e| e.number);

        info!(
            "Fetched {} episodes for {} on {}",
            episodes.len(),
            provider_id,
            self.provider.id()
        );

        episodes
    }

    /// One page with retries; `None` once retries are exhausted or the payload is unreadable
    async fn fetch_page(&self, provider_id: &str, page: u32) -> Option<EpisodePage> {
        let operation = format!("{} episodes {} page {}", self.provider.id(), provider_id, page);
        let raw = match with_retry(self.config.retry, &operation, || {
            self.provider.episode_page(provider_id, page)
        })
        .await
        {
            Ok(raw) => raw,
            Err(e) => {
                let exhausted = ResolverError::PageFetchExhausted {
                    page,
                    attempts: self.config.retry.max_attempts(),
                };
                warn!("{} for {}: {}", exhausted, provider_id, e);
                return None;
            }
        };

        match self.decoder.decode(&raw, page, provider_id) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

/// Page count from the first page's metadata and an optional episode count hint
fn total_pages(first: &EpisodePage, known_total: Option<u32>) -> u32 {
    if let Some(last_page) = first.last_page.filter(|p| *p > 0) {
        return last_page;
    }

    let total = first
        .total_episodes_reported
        .unwrap_or(0)
        .max(known_total.unwrap_or(0));
    let per_page = first
        .per_page
        .filter(|n| *n > 0)
        .or_else(|| u32::try_from(first.episodes.len()).ok().filter(|n| *n > 0));

    match per_page {
        Some(per_page) if total > 0 => total.div_ceil(per_page).max(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(per_page: Option<u32>, total: Option<u32>, last_page: Option<u32>) -> EpisodePage {
        EpisodePage {
            page_number: 1,
            episodes: Vec::new(),
            per_page,
            total_episodes_reported: total,
            last_page,
        }
    }

    #[test]
    fn test_total_pages_from_total() {
        assert_eq!(total_pages(&page(Some(30), Some(55), None), None), 2);
        assert_eq!(total_pages(&page(Some(30), Some(30), None), None), 1);
    }

    #[test]
    fn test_last_page_wins() {
        assert_eq!(total_pages(&page(Some(30), Some(55), Some(4)), Some(500)), 4);
    }

    #[test]
    fn test_known_total_corrects_under_reporting() {
        assert_eq!(total_pages(&page(Some(30), Some(30), None), Some(64)), 3);
        assert_eq!(total_pages(&page(Some(30), Some(90), None), Some(12)), 3);
    }

    #[test]
    fn test_per_page_falls_back_to_page_size() {
        let mut first = page(None, Some(50), None);
        first.episodes = (1..=25).map(|n| EpisodeRecord::new(n.to_string(), n)).collect();
        assert_eq!(total_pages(&first, None), 2);
    }

    #[test]
    fn test_missing_metadata_is_single_page() {
        assert_eq!(total_pages(&page(None, None, None), None), 1);
        assert_eq!(total_pages(&page(Some(0), Some(10), None), None), 1);
    }
}

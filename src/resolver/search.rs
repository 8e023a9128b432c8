use crate::resolver::{
    matcher::{MIN_ACCEPT_SCORE, Matcher},
    provider::StreamingProvider,
    retry::{RetryPolicy, with_retry},
    title::extract_base_title,
    types::{CanonicalMedia, MatchResult, MediaStatus, SearchFilters},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Search strategies, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Full english title with type, status and year
    English,
    /// Season-stripped english title with type, status and year
    EnglishBase,
    /// Full romaji title with type, status and year
    Romaji,
    /// Season-stripped romaji title with type, status and year
    RomajiBase,
    /// First synonyms with type and status
    Synonym,
    /// Full english title with type and status
    EnglishWithoutYear,
    /// Season-stripped title, unfiltered
    BaseUnfiltered,
}

/// One planned provider search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub strategy: SearchStrategy,
    pub query: String,
    pub filters: SearchFilters,
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProvider {
    /// Provider the id belongs to
    pub provider: String,
    pub provider_id: String,
    pub display_name: String,
    pub score: f64,
    pub strategy: SearchStrategy,
    /// Episode count advertised by the winning candidate
    pub known_episode_count: Option<u32>,
    /// Catalog airing status at resolution time
    pub status: MediaStatus,
}

/// Runs the strategy ladder against one provider until a candidate is accepted
pub struct SearchOrchestrator {
    provider: Arc<dyn StreamingProvider>,
    min_score: f64,
    max_synonyms: usize,
    retry: RetryPolicy,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn StreamingProvider>) -> Self {
        Self {
            provider,
            min_score: MIN_ACCEPT_SCORE,
            max_synonyms: 3,
            retry: RetryPolicy::none(),
        }
    }

    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    #[must_use]
    pub fn with_max_synonyms(mut self, max_synonyms: usize) -> Self {
        self.max_synonyms = max_synonyms;
        self
    }

    /// Retry policy for search calls; searches are not retried by default
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve the provider id for a catalog record, `None` when nothing is accepted
    pub async fn resolve_provider(&self, media: &CanonicalMedia) -> Option<String> {
        self.resolve(media).await.map(|r| r.provider_id)
    }

    /// Resolve a catalog record with the full match detail
    pub async fn resolve(&self, media: &CanonicalMedia) -> Option<ResolvedProvider> {
        let attempts = self.plan(media);
        debug!(
            "Resolving {} ({}) on {} with {} search attempts",
            media.display_title(),
            media.id,
            self.provider.id(),
            attempts.len()
        );

        for attempt in &attempts {
            let Some(best) = self.run_attempt(media, attempt).await else {
                continue;
            };

            info!(
                "Resolved {} on {}: {} ({}) score {:.1} via {:?}",
                media.id,
                self.provider.id(),
                best.candidate.display_name,
                best.candidate.provider_id,
                best.score,
                attempt.strategy
            );

            return Some(ResolvedProvider {
                provider: self.provider.id().to_string(),
                known_episode_count: best.candidate.max_episode_count(),
                provider_id: best.candidate.provider_id,
                display_name: best.candidate.display_name,
                score: best.score,
                strategy: attempt.strategy,
                status: media.status,
            });
        }

        info!(
            "No match for {} ({}) on {}",
            media.display_title(),
            media.id,
            self.provider.id()
        );
        None
    }

    /// Build the ordered list of searches for a catalog record
    #[must_use]
    pub fn plan(&self, media: &CanonicalMedia) -> Vec<SearchAttempt> {
        let english = clean(media.titles.english.as_deref());
        let romaji = clean(media.titles.romaji.as_deref());

        let filtered = SearchFilters::full(media.format, media.status, media.season_year);
        let without_year = filtered.without_year();

        let mut attempts = Vec::new();
        let mut push = |strategy, query: &str, filters| {
            if !query.is_empty() {
                attempts.push(SearchAttempt {
                    strategy,
                    query: query.to_string(),
                    filters,
                });
            }
        };

        push(SearchStrategy::English, english, filtered);
        let english_base = extract_base_title(english);
        if english_base != english {
            push(SearchStrategy::EnglishBase, &english_base, filtered);
        }

        push(SearchStrategy::Romaji, romaji, filtered);
        let romaji_base = extract_base_title(romaji);
        if romaji_base != romaji {
            push(SearchStrategy::RomajiBase, &romaji_base, filtered);
        }

        for synonym in media.synonyms.iter().take(self.max_synonyms) {
            push(SearchStrategy::Synonym, clean(Some(synonym.as_str())), without_year);
        }

        push(SearchStrategy::EnglishWithoutYear, english, without_year);

        let fallback = if english.is_empty() { romaji } else { english };
        push(
            SearchStrategy::BaseUnfiltered,
            &extract_base_title(fallback),
            SearchFilters::none(),
        );

        attempts
    }

    /// Search once and keep the best candidate if it is accepted
    async fn run_attempt(
        &self,
        media: &CanonicalMedia,
        attempt: &SearchAttempt,
    ) -> Option<MatchResult> {
        let operation = format!("{} search {:?}", self.provider.id(), attempt.query);
        let candidates = match with_retry(self.retry, &operation, || {
            self.provider.search(&attempt.query, &attempt.filters)
        })
        .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("{:?} on {} failed: {}", attempt.strategy, self.provider.id(), e);
                return None;
            }
        };

        let count = candidates.len();
        let best = Matcher::rank(candidates, media).into_iter().next();

        match best {
            Some(best) if best.score >= self.min_score => Some(best.into()),
            Some(best) => {
                debug!(
                    "{:?} {:?}: best of {} was {} at {:.1}, below {:.1}",
                    attempt.strategy,
                    attempt.query,
                    count,
                    best.candidate.display_name,
                    best.score,
                    self.min_score
                );
                None
            }
            None => {
                debug!("{:?} {:?}: no candidates", attempt.strategy, attempt.query);
                None
            }
        }
    }
}

fn clean(title: Option<&str>) -> &str {
    title.map(str::trim).unwrap_or_default()
}

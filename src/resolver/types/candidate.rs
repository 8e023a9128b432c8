use super::{MediaFormat, MediaStatus};
use serde::{Deserialize, Serialize};

/// One search hit from a provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCandidate {
    /// Provider-scoped key, only unique within one provider
    pub provider_id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sub_episode_count: Option<u32>,
    pub dub_episode_count: Option<u32>,
    pub release_year: Option<i32>,
}

impl ProviderCandidate {
    pub fn new(provider_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set type label
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Builder pattern: set subbed episode count
    #[must_use]
    pub fn with_sub_episodes(mut self, count: Option<u32>) -> Self {
        self.sub_episode_count = count;
        self
    }

    /// Builder pattern: set dubbed episode count
    #[must_use]
    pub fn with_dub_episodes(mut self, count: Option<u32>) -> Self {
        self.dub_episode_count = count;
        self
    }

    /// Builder pattern: set release year
    #[must_use]
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.release_year = year;
        self
    }

    /// Episode count used for scoring, sub preferred over dub
    #[must_use]
    pub fn episode_count(&self) -> Option<u32> {
        self.sub_episode_count.or(self.dub_episode_count)
    }

    /// Largest episode count the provider advertises
    #[must_use]
    pub fn max_episode_count(&self) -> Option<u32> {
        match (self.sub_episode_count, self.dub_episode_count) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Best scored candidate of a strategy attempt
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub candidate: ProviderCandidate,
    pub score: f64,
}

/// Filters passed along with a provider search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub format: Option<MediaFormat>,
    pub status: Option<MediaStatus>,
    pub year: Option<i32>,
}

impl SearchFilters {
    /// No filtering at all
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Type, status and year
    #[must_use]
    pub const fn full(format: MediaFormat, status: MediaStatus, year: Option<i32>) -> Self {
        Self {
            format: Some(format),
            status: Some(status),
            year,
        }
    }

    /// Builder pattern: drop the year filter
    #[must_use]
    pub const fn without_year(mut self) -> Self {
        self.year = None;
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.format.is_none() && self.status.is_none() && self.year.is_none()
    }
}

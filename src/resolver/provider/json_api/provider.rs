use super::api_types::SearchResponse;
use crate::resolver::{
    Result, ResolverError,
    provider::{HttpClient, StreamingProvider},
    types::{MediaStatus, ProviderCandidate, SearchFilters},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Endpoint description of a JSON provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    /// Provider identifier (e.g., "pahe")
    pub id: String,
    /// Human-readable provider name
    pub name: String,
    pub base_url: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Must contain an `{id}` placeholder
    #[serde(default = "default_episodes_path")]
    pub episodes_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_search_path() -> String {
    "/search".to_string()
}

fn default_episodes_path() -> String {
    "/anime/{id}/episodes".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl ProviderEndpoint {
    pub fn new(id: impl Into<String>, base_url: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            base_url: base_url.into(),
            search_path: default_search_path(),
            episodes_path: default_episodes_path(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Check the endpoint is usable
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ResolverError::Config("provider id is empty".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ResolverError::Config(format!(
                "provider {} has no base_url",
                self.id
            )));
        }
        if !self.episodes_path.contains("{id}") {
            return Err(ResolverError::Config(format!(
                "provider {} episodes_path lacks an {{id}} placeholder",
                self.id
            )));
        }
        Ok(())
    }

    /// Episode listing path for a provider key
    #[must_use]
    pub fn episodes_endpoint(&self, provider_id: &str) -> String {
        self.episodes_path
            .replace("{id}", &urlencoding::encode(provider_id))
    }
}

/// Provider speaking a plain JSON search/listing API
pub struct JsonApiProvider {
    endpoint: ProviderEndpoint,
    client: HttpClient,
}

impl JsonApiProvider {
    pub fn new(endpoint: ProviderEndpoint) -> Result<Self> {
        endpoint.validate()?;
        let client = HttpClient::new(endpoint.base_url.clone(), endpoint.timeout_secs)?;
        Ok(Self { endpoint, client })
    }

    /// Translate catalog filters into the provider's query vocabulary
    fn filter_params(query: &str, filters: &SearchFilters) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", query.to_string())];

        if let Some(format) = filters.format {
            params.push(("type", format.provider_type().to_string()));
        }
        if let Some(status) = filters.status {
            let status = match status {
                MediaStatus::Ongoing => "Ongoing",
                MediaStatus::Finished => "Completed",
                MediaStatus::Unreleased => "Upcoming",
            };
            params.push(("status", status.to_string()));
        }
        if let Some(year) = filters.year {
            params.push(("year", year.to_string()));
        }

        params
    }
}

#[async_trait]
impl StreamingProvider for JsonApiProvider {
    fn id(&self) -> &str {
        &self.endpoint.id
    }

    fn name(&self) -> &str {
        &self.endpoint.name
    }

    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<ProviderCandidate>> {
        let params = Self::filter_params(query, filters);
        let response: SearchResponse = self
            .client
            .get_with_params(&self.endpoint.search_path, &params)
            .await?;

        let candidates = response.into_candidates();

        debug!(
            "Provider {} returned {} candidates for {:?}",
            self.endpoint.id,
            candidates.len(),
            query
        );

        Ok(candidates)
    }

    async fn episode_page(&self, provider_id: &str, page: u32) -> Result<serde_json::Value> {
        let endpoint = self.endpoint.episodes_endpoint(provider_id);
        self.client
            .get_with_params(&endpoint, &[("page", page.to_string())])
            .await
    }
}

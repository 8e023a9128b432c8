//! Layered application configuration.
//!
//! Built-in defaults, then an optional TOML file, then `ANIBRIDGE__*`
//! environment variables.

use crate::resolver::{ANILIST_API_URL, ProviderEndpoint, ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "ANIBRIDGE";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub providers: Vec<ProviderEndpoint>,
    pub matching: MatchingConfig,
    pub episodes: EpisodesConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
}

/// Catalog collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: ANILIST_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Candidate scoring and search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum score to accept a candidate
    pub min_score: f64,
    /// Synonyms searched by the synonym strategy
    pub max_synonyms: usize,
    /// Retries per search call
    pub search_retries: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: 70.0,
            max_synonyms: 3,
            search_retries: 0,
        }
    }
}

/// Episode fetcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodesConfig {
    pub batch_size: usize,
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for EpisodesConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: u64,
    pub resolution_ttl_secs: u64,
    pub ongoing_episodes_ttl_secs: u64,
    pub finished_episodes_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            resolution_ttl_secs: 7 * 86400, // 1 week
            ongoing_episodes_ttl_secs: 3600, // 1 hour
            finished_episodes_ttl_secs: 86400, // 24 hours
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    /// Directory for daily log files
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location when present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ResolverError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/anibridge/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("anibridge").join("config.toml"))
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(ResolverError::Config("catalog.base_url is empty".to_string()));
        }
        if self.episodes.batch_size == 0 {
            return Err(ResolverError::Config(
                "episodes.batch_size must be at least 1".to_string(),
            ));
        }
        if !self.matching.min_score.is_finite() {
            return Err(ResolverError::Config(
                "matching.min_score must be a finite number".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !seen.insert(provider.id.as_str()) {
                return Err(ResolverError::Config(format!(
                    "provider {} is configured twice",
                    provider.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.base_url, ANILIST_API_URL);
        assert_eq!(config.matching.min_score, 70.0);
        assert_eq!(config.matching.max_synonyms, 3);
        assert_eq!(config.episodes.batch_size, 5);
        assert_eq!(config.episodes.max_retries, 3);
        assert_eq!(config.episodes.base_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[episodes]
batch_size = 8

[[providers]]
id = "pahe"
name = "Pahe"
base_url = "https://pahe.example/api"
"#,
        )
        .expect("write config");

        let config = AppConfig::load(Some(&path)).expect("config loads");

        assert_eq!(config.episodes.batch_size, 8);
        assert_eq!(config.episodes.max_retries, 3);
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].episodes_path, "/anime/{id}/episodes");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().expect("temp dir");
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));

        assert!(matches!(result, Err(ResolverError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.episodes.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        let provider = ProviderEndpoint::new("pahe", "https://pahe.example");
        config.providers = vec![provider.clone(), provider];
        assert!(config.validate().is_err());
    }
}

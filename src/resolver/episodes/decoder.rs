//! Ordered decoder for provider episode listings.
//!
//! Providers disagree on the listing envelope, so each accepted shape is a
//! matcher tried in order; the first one that fits wins.

use crate::resolver::{
    Result, ResolverError, lenient,
    types::{EpisodePage, EpisodeRecord},
};
use serde::Deserialize;
use serde_json::Value;

/// Listing envelope after shape matching, before episode conversion
#[derive(Debug, Default)]
pub struct RawPage {
    pub episodes: Vec<Value>,
    pub per_page: Option<u32>,
    pub total: Option<u32>,
    pub last_page: Option<u32>,
}

/// A shape matcher returns `None` when the payload is not its shape
pub type ShapeMatcher = fn(&Value) -> Option<RawPage>;

/// Pagination block; every spelling is kept so payloads carrying two of them still decode
#[derive(Debug, Default, Deserialize)]
struct PaginationMeta {
    per_page: Option<Value>,
    #[serde(rename = "perPage")]
    per_page_camel: Option<Value>,
    total: Option<Value>,
    #[serde(rename = "totalItems")]
    total_items: Option<Value>,
    #[serde(rename = "totalEpisodes")]
    total_episodes: Option<Value>,
    last_page: Option<Value>,
    #[serde(rename = "lastPage")]
    last_page_camel: Option<Value>,
    #[serde(rename = "totalPages")]
    total_pages: Option<Value>,
}

impl PaginationMeta {
    fn into_raw(self, episodes: Vec<Value>) -> RawPage {
        RawPage {
            episodes,
            per_page: lenient::first_u32(&[&self.per_page_camel, &self.per_page]),
            total: lenient::first_u32(&[&self.total, &self.total_items, &self.total_episodes]),
            last_page: lenient::first_u32(&[
                &self.last_page_camel,
                &self.last_page,
                &self.total_pages,
            ]),
        }
    }
}

/// `{data: [...], paginationInfo: {...}}`
#[derive(Debug, Deserialize)]
struct PaginationInfoShape {
    data: Vec<Value>,
    #[serde(rename = "paginationInfo")]
    pagination_info: PaginationMeta,
}

/// `{episodes: [...], pagination: {...}}`
#[derive(Debug, Deserialize)]
struct PaginationShape {
    episodes: Vec<Value>,
    #[serde(default)]
    pagination: PaginationMeta,
}

/// `{data: [...], total, per_page, last_page}`
#[derive(Debug, Deserialize)]
struct FlatShape {
    data: Vec<Value>,
    #[serde(flatten)]
    meta: PaginationMeta,
}

fn pagination_info_shape(value: &Value) -> Option<RawPage> {
    let shape = PaginationInfoShape::deserialize(value).ok()?;
    Some(shape.pagination_info.into_raw(shape.data))
}

fn pagination_shape(value: &Value) -> Option<RawPage> {
    let shape = PaginationShape::deserialize(value).ok()?;
    Some(shape.pagination.into_raw(shape.episodes))
}

fn flat_shape(value: &Value) -> Option<RawPage> {
    let shape = FlatShape::deserialize(value).ok()?;
    Some(shape.meta.into_raw(shape.data))
}

fn bare_array(value: &Value) -> Option<RawPage> {
    let episodes = value.as_array()?.clone();
    Some(RawPage {
        episodes,
        ..Default::default()
    })
}

/// One episode object; keys differ between providers
#[derive(Debug, Deserialize)]
struct RawEpisode {
    id: Option<Value>,
    session: Option<String>,
    #[serde(rename = "episodeId")]
    episode_id: Option<Value>,
    number: Option<Value>,
    episode: Option<Value>,
    #[serde(rename = "episodeNumber")]
    episode_number: Option<Value>,
    title: Option<String>,
    #[serde(rename = "isFiller")]
    is_filler: Option<Value>,
    filler: Option<Value>,
}

impl RawEpisode {
    fn into_record(self, parent: &str) -> Option<EpisodeRecord> {
        let number = lenient::first_u32(&[&self.number, &self.episode, &self.episode_number])?;

        let id = lenient::first_key(&[&self.episode_id, &self.id])
            .or_else(|| self.session.clone())
            .unwrap_or_else(|| format!("{parent}-{number}"));
        let session = self.session.filter(|s| !s.is_empty()).unwrap_or_else(|| id.clone());

        let is_filler = [&self.is_filler, &self.filler]
            .into_iter()
            .flatten()
            .any(lenient::to_flag);

        let mut record = EpisodeRecord::new(id, number)
            .with_filler(is_filler)
            .with_parent(parent);
        record.provider_session_id = session;
        record.title = self.title.filter(|t| !t.trim().is_empty());
        Some(record)
    }
}

/// Decodes listing payloads with an ordered list of shape matchers
pub struct EpisodeDecoder {
    matchers: Vec<(&'static str, ShapeMatcher)>,
}

impl Default for EpisodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeDecoder {
    pub fn new() -> Self {
        Self {
            matchers: vec![
                ("paginationInfo", pagination_info_shape as ShapeMatcher),
                ("pagination", pagination_shape),
                ("flat", flat_shape),
                ("array", bare_array),
            ],
        }
    }

    /// Decoder with a custom matcher order
    pub fn with_matchers(matchers: Vec<(&'static str, ShapeMatcher)>) -> Self {
        Self { matchers }
    }

    /// Decode one page; episodes without a number are dropped
    pub fn decode(&self, value: &Value, page_number: u32, parent: &str) -> Result<EpisodePage> {
        let raw = self
            .matchers
            .iter()
            .find_map(|(_, matcher)| matcher(value))
            .ok_or_else(|| {
                ResolverError::MalformedResponse(format!(
                    "page {page_number} of {parent} matches no known listing shape"
                ))
            })?;

        let episodes = raw
            .episodes
            .into_iter()
            .filter_map(|v| RawEpisode::deserialize(v).ok())
            .filter_map(|e| e.into_record(parent))
            .collect();

        Ok(EpisodePage {
            page_number,
            episodes,
            per_page: raw.per_page,
            total_episodes_reported: raw.total,
            last_page: raw.last_page,
        })
    }
}

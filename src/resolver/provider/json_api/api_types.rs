use crate::resolver::{lenient, types::ProviderCandidate};
use serde::Deserialize;
use serde_json::Value;

/// Search payload: `{results: [...]}`, `{data: [...]}` or a bare array.
///
/// Items stay raw so one unreadable hit does not discard the others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Bare(Vec<Value>),
    Wrapped {
        results: Option<Vec<Value>>,
        data: Option<Vec<Value>>,
    },
}

impl SearchResponse {
    /// Candidates from every readable item, in provider order
    pub fn into_candidates(self) -> Vec<ProviderCandidate> {
        let items = match self {
            Self::Bare(items) => items,
            Self::Wrapped { results, data } => results.or(data).unwrap_or_default(),
        };

        items
            .into_iter()
            .filter_map(|item| SearchItem::deserialize(item).ok())
            .filter_map(SearchItem::into_candidate)
            .collect()
    }
}

/// One search hit; each spelling of a field is kept apart
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    session: Option<Value>,
    #[serde(rename = "providerId")]
    provider_id: Option<Value>,
    id: Option<Value>,
    title: Option<Value>,
    name: Option<Value>,
    #[serde(rename = "displayName")]
    display_name: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<Value>,
    sub: Option<Value>,
    #[serde(rename = "subEpisodeCount")]
    sub_episode_count: Option<Value>,
    episodes: Option<Value>,
    dub: Option<Value>,
    #[serde(rename = "dubEpisodeCount")]
    dub_episode_count: Option<Value>,
    year: Option<Value>,
    #[serde(rename = "releaseYear")]
    release_year: Option<Value>,
}

impl SearchItem {
    /// Convert into a candidate; items without a key or a name are dropped
    pub fn into_candidate(self) -> Option<ProviderCandidate> {
        let key = lenient::first_key(&[&self.session, &self.provider_id, &self.id])?;
        let title = lenient::first_text(&[&self.title, &self.name, &self.display_name])?;

        let mut candidate = ProviderCandidate::new(key, title)
            .with_sub_episodes(lenient::first_u32(&[
                &self.sub,
                &self.sub_episode_count,
                &self.episodes,
            ]))
            .with_dub_episodes(lenient::first_u32(&[&self.dub, &self.dub_episode_count]))
            .with_year(
                lenient::first_u32(&[&self.year, &self.release_year])
                    .and_then(|year| i32::try_from(year).ok()),
            );
        candidate.kind = lenient::first_text(&[&self.kind]);
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(value: Value) -> Vec<ProviderCandidate> {
        serde_json::from_value::<SearchResponse>(value)
            .expect("search payload")
            .into_candidates()
    }

    #[test]
    fn test_wrapped_and_bare_shapes() {
        let wrapped = candidates(json!({
            "data": [{
                "id": 4, "session": "abc", "title": "Frieren",
                "type": "TV", "episodes": 28, "year": 2023
            }]
        }));
        let bare = candidates(json!([
            { "providerId": "frieren-18542", "name": "Frieren", "sub": 28, "dub": 20 }
        ]));

        assert_eq!(wrapped[0].provider_id, "abc");
        assert_eq!(wrapped[0].kind.as_deref(), Some("TV"));
        assert_eq!(wrapped[0].sub_episode_count, Some(28));
        assert_eq!(wrapped[0].release_year, Some(2023));

        assert_eq!(bare[0].provider_id, "frieren-18542");
        assert_eq!(bare[0].max_episode_count(), Some(28));
    }

    #[test]
    fn test_item_with_two_name_spellings() {
        let found = candidates(json!({
            "results": [
                { "id": "frieren-1", "title": "Frieren", "name": "Sousou no Frieren" },
                { "id": "other", "title": "Other" }
            ]
        }));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].display_name, "Frieren");
        assert_eq!(found[1].provider_id, "other");
    }

    #[test]
    fn test_loosely_typed_fields() {
        let found = candidates(json!({
            "results": [
                { "id": "a", "title": "A", "year": "2019", "releaseYear": 2018, "sub": "12" },
                { "id": "b", "title": "B", "year": { "start": 2020 } }
            ]
        }));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].release_year, Some(2019));
        assert_eq!(found[0].sub_episode_count, Some(12));
        assert_eq!(found[1].release_year, None);
    }

    #[test]
    fn test_unreadable_items_skipped() {
        let found = candidates(json!([
            "garbage",
            { "id": "x" },
            { "id": 991, "title": "Show" }
        ]));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].provider_id, "991");
    }

    #[test]
    fn test_error_object_yields_nothing() {
        assert!(candidates(json!({ "message": "no results" })).is_empty());
    }
}

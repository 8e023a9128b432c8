use super::api_types::*;
use crate::resolver::{
    Result, ResolverError,
    provider::{CatalogProvider, HttpClient},
    types::{
        CanonicalMedia, MediaFormat, MediaRelation, MediaStatus, MediaTitles, RelatedNode,
        RelationType,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// Public AniList GraphQL endpoint
pub const ANILIST_API_URL: &str = "https://graphql.anilist.co";

const MEDIA_QUERY: &str = r#"
    query ($id: Int) {
        Media(id: $id, type: ANIME) {
            id
            title { romaji english native }
            format
            status
            seasonYear
            episodes
            synonyms
            relations {
                edges {
                    relationType
                    node {
                        id
                        format
                        title { romaji english native }
                        startDate { year month day }
                    }
                }
            }
        }
    }
"#;

/// AniList GraphQL catalog client
pub struct AniListCatalog {
    client: HttpClient,
}

impl AniListCatalog {
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout_secs)?,
        })
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<T>> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables
        });

        let response: GraphQLResponse<T> = self.client.post_json("", &body).await?;

        if let Some(errors) = response.errors
            && let Some(error) = errors.first()
        {
            return Err(ResolverError::Api {
                status: error.status.unwrap_or(400),
                message: error.message.clone(),
            });
        }

        Ok(response.data)
    }
}

#[async_trait]
impl CatalogProvider for AniListCatalog {
    fn id(&self) -> &'static str {
        "anilist"
    }

    async fn get_media(&self, id: i64) -> Result<Option<CanonicalMedia>> {
        let variables = serde_json::json!({ "id": id });

        match self.query::<MediaData>(MEDIA_QUERY, variables).await {
            Ok(data) => Ok(data.and_then(|d| d.media).map(media_to_canonical)),
            // AniList answers unknown ids with a 404 GraphQL error
            Err(ResolverError::Api { status: 404, .. }) => {
                debug!("AniList has no media with id {}", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn media_to_canonical(media: Media) -> CanonicalMedia {
    let relations = media
        .relations
        .map(|r| r.edges.into_iter().map(edge_to_relation).collect())
        .unwrap_or_default();

    CanonicalMedia {
        id: media.id,
        titles: title_to_titles(media.title),
        synonyms: media.synonyms.unwrap_or_default(),
        format: media
            .format
            .as_deref()
            .and_then(parse_format)
            .unwrap_or_default(),
        status: media
            .status
            .as_deref()
            .map(parse_status)
            .unwrap_or_default(),
        season_year: media.season_year,
        episode_count: media.episodes,
        relations,
    }
}

fn edge_to_relation(edge: RelationEdge) -> MediaRelation {
    MediaRelation {
        relation_type: edge
            .relation_type
            .as_deref()
            .map_or(RelationType::Other, parse_relation_type),
        node: RelatedNode {
            id: edge.node.id,
            format: edge.node.format.as_deref().and_then(parse_format),
            title: title_to_titles(edge.node.title),
            start_date: edge.node.start_date.as_ref().and_then(FuzzyDate::to_date),
        },
    }
}

fn title_to_titles(title: Title) -> MediaTitles {
    MediaTitles {
        romaji: title.romaji,
        english: title.english,
        native: title.native,
    }
}

fn parse_format(format: &str) -> Option<MediaFormat> {
    let format = match format {
        "TV" | "TV_SHORT" => MediaFormat::Tv,
        "MOVIE" => MediaFormat::Movie,
        "OVA" => MediaFormat::Ova,
        "ONA" => MediaFormat::Ona,
        "SPECIAL" => MediaFormat::Special,
        "MUSIC" => MediaFormat::Music,
        _ => return None,
    };
    Some(format)
}

fn parse_status(status: &str) -> MediaStatus {
    match status {
        "RELEASING" | "HIATUS" => MediaStatus::Ongoing,
        "NOT_YET_RELEASED" => MediaStatus::Unreleased,
        _ => MediaStatus::Finished,
    }
}

fn parse_relation_type(relation: &str) -> RelationType {
    match relation {
        "PREQUEL" => RelationType::Prequel,
        "SEQUEL" => RelationType::Sequel,
        "PARENT" => RelationType::Parent,
        "SIDE_STORY" => RelationType::SideStory,
        "ALTERNATIVE" => RelationType::Alternative,
        "SPIN_OFF" => RelationType::SpinOff,
        "ADAPTATION" => RelationType::Adaptation,
        _ => RelationType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_to_canonical() {
        let raw = serde_json::json!({
            "Media": {
                "id": 20958,
                "title": {
                    "romaji": "Shingeki no Kyojin 2",
                    "english": "Attack on Titan Season 2",
                    "native": null
                },
                "format": "TV",
                "status": "FINISHED",
                "seasonYear": 2017,
                "episodes": 12,
                "synonyms": ["AoT 2"],
                "relations": { "edges": [
                    { "relationType": "PREQUEL", "node": { "id": 16498, "format": "TV",
                      "title": { "romaji": "Shingeki no Kyojin" },
                      "startDate": { "year": 2013, "month": 4, "day": 7 } } },
                    { "relationType": "ADAPTATION", "node": { "id": 53390, "format": "MANGA",
                      "title": {},
                      "startDate": { "year": 2009, "month": null, "day": null } } }
                ] }
            }
        });

        let data: MediaData = serde_json::from_value(raw).expect("valid payload");
        let media = media_to_canonical(data.media.expect("media present"));

        assert_eq!(media.id, 20958);
        assert_eq!(media.format, MediaFormat::Tv);
        assert_eq!(media.status, MediaStatus::Finished);
        assert_eq!(media.episode_count, Some(12));
        assert_eq!(media.synonyms, vec!["AoT 2".to_string()]);
        assert_eq!(media.relations.len(), 2);
        assert_eq!(media.relations[0].relation_type, RelationType::Prequel);
        assert_eq!(
            media.relations[0].node.start_date,
            chrono::NaiveDate::from_ymd_opt(2013, 4, 7)
        );
        assert_eq!(media.relations[1].node.format, None);
        assert!(media.relations[0].is_season_prequel());
    }

    #[test]
    fn test_null_media() {
        let data: MediaData =
            serde_json::from_value(serde_json::json!({ "Media": null })).expect("valid payload");
        assert!(data.media.is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(parse_status("RELEASING"), MediaStatus::Ongoing);
        assert_eq!(parse_status("NOT_YET_RELEASED"), MediaStatus::Unreleased);
        assert_eq!(parse_status("CANCELLED"), MediaStatus::Finished);
    }
}

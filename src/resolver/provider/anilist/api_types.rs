use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: Option<Media>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    pub id: i64,
    pub title: Title,
    pub format: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "seasonYear")]
    pub season_year: Option<i32>,
    pub episodes: Option<u32>,
    pub synonyms: Option<Vec<String>>,
    pub relations: Option<Relations>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Title {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Relations {
    pub edges: Vec<RelationEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RelationEdge {
    #[serde(rename = "relationType")]
    pub relation_type: Option<String>,
    pub node: RelationNode,
}

#[derive(Debug, Deserialize)]
pub struct RelationNode {
    pub id: i64,
    pub format: Option<String>,
    #[serde(default)]
    pub title: Title,
    #[serde(rename = "startDate")]
    pub start_date: Option<FuzzyDate>,
}

#[derive(Debug, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// Full date when year, month and day are all known
    pub fn to_date(&self) -> Option<chrono::NaiveDate> {
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => chrono::NaiveDate::from_ymd_opt(y, m, d),
            (Some(y), Some(m), None) => chrono::NaiveDate::from_ymd_opt(y, m, 1),
            (Some(y), None, _) => chrono::NaiveDate::from_ymd_opt(y, 1, 1),
            _ => None,
        }
    }
}

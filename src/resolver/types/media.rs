use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog release format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaFormat {
    #[default]
    Tv,
    Movie,
    Ova,
    Ona,
    Special,
    Music,
}

impl MediaFormat {
    /// Formats that do not count as a season when walking prequels
    #[must_use]
    pub const fn is_side_story(self) -> bool {
        matches!(self, Self::Movie | Self::Special | Self::Ova)
    }

    /// Provider-facing type label
    #[must_use]
    pub const fn provider_type(self) -> &'static str {
        match self {
            Self::Tv => "TV",
            Self::Movie => "Movie",
            Self::Ova => "OVA",
            Self::Ona => "ONA",
            Self::Special => "Special",
            Self::Music => "Music",
        }
    }

    /// Check whether a provider's free-form type label denotes this format
    #[must_use]
    pub fn matches_provider_type(self, label: &str) -> bool {
        let label = label.trim();
        label.eq_ignore_ascii_case(self.provider_type())
            || (self == Self::Tv && label.eq_ignore_ascii_case("tv series"))
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.provider_type())
    }
}

/// Catalog airing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Ongoing,
    #[default]
    Finished,
    Unreleased,
}

/// Title variants from the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaTitles {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

/// Relation kind between two catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Prequel,
    Sequel,
    Parent,
    SideStory,
    Alternative,
    SpinOff,
    Adaptation,
    Other,
}

/// The far end of a relation edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedNode {
    pub id: i64,
    pub format: Option<MediaFormat>,
    pub title: MediaTitles,
    pub start_date: Option<NaiveDate>,
}

/// A relation edge of a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRelation {
    pub relation_type: RelationType,
    pub node: RelatedNode,
}

impl MediaRelation {
    pub fn new(relation_type: RelationType, id: i64, format: Option<MediaFormat>) -> Self {
        Self {
            relation_type,
            node: RelatedNode {
                id,
                format,
                title: MediaTitles::default(),
                start_date: None,
            },
        }
    }

    /// Prequel edge pointing at a regular season (not a movie, special or OVA)
    #[must_use]
    pub fn is_season_prequel(&self) -> bool {
        self.relation_type == RelationType::Prequel
            && !self.node.format.is_some_and(MediaFormat::is_side_story)
    }
}

/// Authoritative catalog record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalMedia {
    pub id: i64,
    pub titles: MediaTitles,
    pub synonyms: Vec<String>,
    pub format: MediaFormat,
    pub status: MediaStatus,
    pub season_year: Option<i32>,
    pub episode_count: Option<u32>,
    pub relations: Vec<MediaRelation>,
}

impl CanonicalMedia {
    /// Create a record with an id and english title
    pub fn new(id: i64, english: impl Into<String>) -> Self {
        Self {
            id,
            titles: MediaTitles {
                english: Some(english.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Builder pattern: set romaji title
    #[must_use]
    pub fn with_romaji(mut self, romaji: impl Into<String>) -> Self {
        self.titles.romaji = Some(romaji.into());
        self
    }

    /// Builder pattern: add synonym
    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.push(synonym.into());
        self
    }

    /// Builder pattern: set format
    #[must_use]
    pub fn with_format(mut self, format: MediaFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder pattern: set status
    #[must_use]
    pub fn with_status(mut self, status: MediaStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder pattern: set season year
    #[must_use]
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.season_year = year;
        self
    }

    /// Builder pattern: set episode count
    #[must_use]
    pub fn with_episodes(mut self, episodes: Option<u32>) -> Self {
        self.episode_count = episodes;
        self
    }

    /// Builder pattern: add relation
    #[must_use]
    pub fn with_relation(mut self, relation: MediaRelation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Titles used for similarity: english, romaji, then synonyms
    pub fn match_titles(&self) -> Vec<&str> {
        let mut titles = Vec::with_capacity(self.synonyms.len() + 2);
        titles.extend(self.titles.english.as_deref());
        titles.extend(self.titles.romaji.as_deref());
        titles.extend(self.synonyms.iter().map(String::as_str));
        titles.retain(|t| !t.trim().is_empty());
        titles
    }

    /// Every non-empty title variant, native included
    pub fn all_titles(&self) -> Vec<&str> {
        let mut titles = self.match_titles();
        if let Some(native) = self.titles.native.as_deref()
            && !native.trim().is_empty()
        {
            titles.push(native);
        }
        titles
    }

    /// English title, falling back to romaji
    pub fn display_title(&self) -> &str {
        self.titles
            .english
            .as_deref()
            .or(self.titles.romaji.as_deref())
            .unwrap_or_default()
    }
}

use serde::{Deserialize, Serialize};

/// One decoded page of a provider episode listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodePage {
    pub page_number: u32,
    pub episodes: Vec<EpisodeRecord>,
    pub per_page: Option<u32>,
    pub total_episodes_reported: Option<u32>,
    pub last_page: Option<u32>,
}

/// A single episode of a resolved provider entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub id: String,
    /// 1-based, may have gaps
    pub number: u32,
    pub title: Option<String>,
    pub is_filler: bool,
    pub provider_session_id: String,
    pub parent_session_id: String,
}

impl EpisodeRecord {
    pub fn new(id: impl Into<String>, number: u32) -> Self {
        let id = id.into();
        Self {
            provider_session_id: id.clone(),
            id,
            number,
            title: None,
            is_filler: false,
            parent_session_id: String::new(),
        }
    }

    /// Builder pattern: set title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder pattern: set filler flag
    #[must_use]
    pub fn with_filler(mut self, is_filler: bool) -> Self {
        self.is_filler = is_filler;
        self
    }

    /// Builder pattern: set parent series session
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_session_id = parent.into();
        self
    }
}

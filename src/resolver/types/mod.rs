mod candidate;
mod episode;
mod media;

pub use candidate::{MatchResult, ProviderCandidate, SearchFilters};
pub use episode::{EpisodePage, EpisodeRecord};
pub use media::{
    CanonicalMedia, MediaFormat, MediaRelation, MediaStatus, MediaTitles, RelatedNode,
    RelationType,
};

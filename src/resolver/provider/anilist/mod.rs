mod api_types;
mod provider;

pub use provider::{ANILIST_API_URL, AniListCatalog};

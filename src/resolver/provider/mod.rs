pub mod anilist;
pub mod json_api;

mod http;
mod traits;

pub use anilist::{ANILIST_API_URL, AniListCatalog};
pub use http::HttpClient;
pub use json_api::{JsonApiProvider, ProviderEndpoint};
pub use traits::{CatalogProvider, StreamingProvider};

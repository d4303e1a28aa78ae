pub mod executor;
pub mod http;
mod service;
pub mod suggest;

pub use executor::{is_likely_service_query, run_selected, run_submitted};
pub use http::HttpSearchBackend;
pub use service::{SearchBackend, SuggestionSource, SEARCH_PATH};
pub use suggest::fetch_suggestions;

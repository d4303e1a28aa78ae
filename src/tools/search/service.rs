use crate::core::error::FetchError;
use crate::types::{SearchResult, SearchScope, SuggestionItem};
use async_trait::async_trait;

/// The two suggestion endpoints queried per keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionSource {
    /// `/api/search/suggestions`: spas matched by name, area, description or address.
    Spas,
    /// `/api/search/services`: spas grouped by matching service names.
    Services,
}

impl SuggestionSource {
    pub fn path(&self) -> &'static str {
        match self {
            SuggestionSource::Spas => "/api/search/suggestions",
            SuggestionSource::Services => "/api/search/services",
        }
    }
}

pub const SEARCH_PATH: &str = "/api/search";

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn suggest(
        &self,
        source: SuggestionSource,
        query: &str,
    ) -> Result<Vec<SuggestionItem>, FetchError>;

    async fn search(&self, query: &str, scope: SearchScope)
        -> Result<Vec<SearchResult>, FetchError>;
}

use crate::core::error::FetchError;
use crate::types::SuggestionItem;
use tracing::debug;

use super::service::{SearchBackend, SuggestionSource};

/// Query both suggestion endpoints concurrently and concatenate the answers,
/// spa suggestions first, then service suggestions.
///
/// All-or-nothing: if either endpoint fails the whole fetch fails, even when
/// the other one already answered. No deduplication across the two lists.
pub async fn fetch_suggestions(
    backend: &dyn SearchBackend,
    query: &str,
) -> Result<Vec<SuggestionItem>, FetchError> {
    let (spas, services) = tokio::try_join!(
        backend.suggest(SuggestionSource::Spas, query),
        backend.suggest(SuggestionSource::Services, query),
    )?;

    debug!(
        "suggestions for {:?}: {} spas, {} services",
        query,
        spas.len(),
        services.len()
    );

    let mut merged = spas;
    merged.extend(services);
    Ok(merged)
}

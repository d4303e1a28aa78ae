use crate::core::error::FetchError;
use crate::types::{SearchRequest, SearchResult, SearchScope};
use tracing::{debug, warn};

use super::service::SearchBackend;

/// A single word longer than three characters is probably a service name
/// ("massage", "facial"), so it is tried against the service scope first.
pub fn is_likely_service_query(query: &str) -> bool {
    query.chars().count() > 3 && query.split(' ').count() == 1
}

/// Submit path: service-scoped first for likely service names, falling back
/// to an unscoped search when that yields nothing. Any failure renders as
/// zero results.
pub async fn run_submitted(backend: &dyn SearchBackend, query: &str) -> Vec<SearchResult> {
    match submitted(backend, query).await {
        Ok(results) => results,
        Err(e) => {
            warn!("search for {:?} failed: {}", query, e);
            Vec::new()
        }
    }
}

async fn submitted(
    backend: &dyn SearchBackend,
    query: &str,
) -> Result<Vec<SearchResult>, FetchError> {
    if !is_likely_service_query(query) {
        return backend.search(query, SearchScope::All).await;
    }

    let scoped = backend.search(query, SearchScope::Service).await?;
    if !scoped.is_empty() {
        return Ok(scoped);
    }

    debug!("no service matches for {:?}; retrying unscoped", query);
    backend.search(query, SearchScope::All).await
}

/// Selection path: the row's type picks the scope, no fallback.
pub async fn run_selected(backend: &dyn SearchBackend, request: &SearchRequest) -> Vec<SearchResult> {
    match backend.search(&request.query, request.scope).await {
        Ok(results) => results,
        Err(e) => {
            warn!("search for {:?} ({:?}) failed: {}", request.query, request.scope, e);
            Vec::new()
        }
    }
}

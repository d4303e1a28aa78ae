use crate::core::config::SpaSearchConfig;
use crate::core::error::FetchError;
use crate::types::{SearchResult, SearchScope, SuggestionItem};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::service::{SearchBackend, SuggestionSource, SEARCH_PATH};

/// reqwest-backed client for the spa search endpoints.
#[derive(Clone)]
pub struct HttpSearchBackend {
    client: reqwest::Client,
    base_url: Url,
    // key: "<endpoint path>|<query>"
    suggestion_cache: Option<moka::future::Cache<String, Vec<SuggestionItem>>>,
}

impl std::fmt::Debug for HttpSearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSearchBackend")
            .field("base_url", &self.base_url.as_str())
            .field("suggestion_cache", &self.suggestion_cache.is_some())
            .finish()
    }
}

impl HttpSearchBackend {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            suggestion_cache: None,
        })
    }

    pub fn from_config(client: reqwest::Client, config: &SpaSearchConfig) -> Result<Self, FetchError> {
        let backend = Self::new(client, &config.resolve_base_url())?;
        Ok(match config.resolve_suggestion_cache_ttl() {
            Some(ttl) => backend.with_suggestion_cache(ttl),
            None => backend,
        })
    }

    pub fn with_suggestion_cache(mut self, ttl: std::time::Duration) -> Self {
        self.suggestion_cache = Some(
            moka::future::Cache::builder()
                .max_capacity(2_000)
                .time_to_live(ttl)
                .build(),
        );
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL and append `q` (and `type` when scoped).
    pub fn endpoint_url(
        &self,
        path: &str,
        query: &str,
        type_param: Option<&str>,
    ) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(t) = type_param {
                pairs.append_pair("type", t);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let endpoint = url.path().to_string();
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        resp.json::<T>().await.map_err(|e| FetchError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn suggest(
        &self,
        source: SuggestionSource,
        query: &str,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        let cache_key = format!("{}|{}", source.path(), query);
        if let Some(cache) = &self.suggestion_cache {
            if let Some(hit) = cache.get(&cache_key).await {
                debug!("suggestion cache hit for {}", cache_key);
                return Ok(hit);
            }
        }

        let url = self.endpoint_url(source.path(), query, None)?;
        let items: Vec<SuggestionItem> = self.get_json(url).await?;

        if let Some(cache) = &self.suggestion_cache {
            cache.insert(cache_key, items.clone()).await;
        }
        Ok(items)
    }

    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
    ) -> Result<Vec<SearchResult>, FetchError> {
        let url = self.endpoint_url(SEARCH_PATH, query, scope.type_param())?;
        self.get_json(url).await
    }
}

use std::sync::Arc;

use super::config::SpaSearchConfig;
use super::error::FetchError;
use crate::features::{SearchSession, SearchView, SessionSettings};
use crate::tools::search::{HttpSearchBackend, SearchBackend};

/// Process-wide handles shared by every search session: the HTTP client,
/// resolved config, and the backend built from them.
#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub config: Arc<SpaSearchConfig>,
    pub backend: Arc<dyn SearchBackend>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.config.resolve_base_url())
            .field(
                "suggestion_cache_ttl",
                &self.config.resolve_suggestion_cache_ttl(),
            )
            .finish()
    }
}

impl AppState {
    /// Builds the reqwest client from the config timeouts.
    pub fn from_config(config: SpaSearchConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.resolve_http_timeout())
            .connect_timeout(config.resolve_http_connect_timeout())
            .build()?;
        Self::new(http_client, config)
    }

    pub fn new(http_client: reqwest::Client, config: SpaSearchConfig) -> Result<Self, FetchError> {
        let backend: Arc<dyn SearchBackend> =
            Arc::new(HttpSearchBackend::from_config(http_client.clone(), &config)?);
        Ok(Self {
            http_client,
            config: Arc::new(config),
            backend,
        })
    }

    /// Swap the backend, e.g. for a fixture implementation.
    pub fn with_backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::from_config(&self.config)
    }

    /// New session bound to `view`; its lifetime is the caller's search flow.
    pub fn new_session(&self, view: Arc<dyn SearchView>) -> SearchSession {
        SearchSession::new(Arc::clone(&self.backend), view, self.session_settings())
    }
}

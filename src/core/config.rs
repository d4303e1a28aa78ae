use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// SpaSearchConfig: file-based config loader (spa-search.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "SPA_SEARCH_CONFIG";
pub const ENV_BASE_URL: &str = "SPA_SEARCH_BASE_URL";
pub const ENV_DEBOUNCE_MS: &str = "SPA_SEARCH_DEBOUNCE_MS";
pub const ENV_MIN_QUERY_CHARS: &str = "SPA_SEARCH_MIN_QUERY_CHARS";
pub const ENV_SUGGESTION_CACHE_TTL: &str = "SPA_SEARCH_SUGGESTION_CACHE_TTL_SECS";
pub const ENV_DEFAULT_IMAGE: &str = "SPA_SEARCH_DEFAULT_IMAGE";
pub const ENV_DESCRIPTION_PREVIEW: &str = "SPA_SEARCH_DESCRIPTION_PREVIEW";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_CONNECT_TIMEOUT: &str = "HTTP_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_IMAGE_URL: &str = "/static/img/default_spa.jpg";

/// Top-level config loaded from `spa-search.json`. Every field is optional;
/// the `resolve_*` accessors apply JSON → env var → built-in default.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct SpaSearchConfig {
    /// Origin the `/api/search*` endpoints are resolved against.
    pub base_url: Option<String>,
    /// Quiet window for keystroke debouncing.
    pub debounce_ms: Option<u64>,
    /// Queries shorter than this never reach the suggestion endpoints.
    pub min_query_chars: Option<usize>,
    /// Lifetime of cached suggestion responses. `0` disables the cache.
    pub suggestion_cache_ttl_secs: Option<u64>,
    /// Card image used when a result carries no `image_url`.
    pub default_image_url: Option<String>,
    /// Description characters shown on a result card before the ellipsis.
    pub description_preview_chars: Option<usize>,
    pub http_timeout_secs: Option<u64>,
    pub http_connect_timeout_secs: Option<u64>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

impl SpaSearchConfig {
    /// Base URL: JSON field → `SPA_SEARCH_BASE_URL` → `http://127.0.0.1:5000`.
    pub fn resolve_base_url(&self) -> String {
        if let Some(u) = &self.base_url {
            if !u.trim().is_empty() {
                return u.trim().to_string();
            }
        }
        env_string(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Debounce window: JSON field → `SPA_SEARCH_DEBOUNCE_MS` → 300ms.
    pub fn resolve_debounce(&self) -> Duration {
        let ms = self
            .debounce_ms
            .or_else(|| env_parsed(ENV_DEBOUNCE_MS))
            .unwrap_or(300);
        Duration::from_millis(ms)
    }

    /// Minimum suggestion query length: JSON field → `SPA_SEARCH_MIN_QUERY_CHARS` → 2.
    /// Never below 1; an empty query must not hit the endpoints.
    pub fn resolve_min_query_chars(&self) -> usize {
        self.min_query_chars
            .or_else(|| env_parsed(ENV_MIN_QUERY_CHARS))
            .unwrap_or(2)
            .max(1)
    }

    /// Suggestion cache TTL: JSON field → `SPA_SEARCH_SUGGESTION_CACHE_TTL_SECS` → 30s.
    /// `None` means caching is off.
    pub fn resolve_suggestion_cache_ttl(&self) -> Option<Duration> {
        let secs = self
            .suggestion_cache_ttl_secs
            .or_else(|| env_parsed(ENV_SUGGESTION_CACHE_TTL))
            .unwrap_or(30);
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Placeholder card image: JSON field → `SPA_SEARCH_DEFAULT_IMAGE` → `/static/img/default_spa.jpg`.
    pub fn resolve_default_image_url(&self) -> String {
        if let Some(u) = &self.default_image_url {
            if !u.trim().is_empty() {
                return u.trim().to_string();
            }
        }
        env_string(ENV_DEFAULT_IMAGE).unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string())
    }

    /// Description preview length: JSON field → `SPA_SEARCH_DESCRIPTION_PREVIEW` → 100.
    pub fn resolve_description_preview_chars(&self) -> usize {
        self.description_preview_chars
            .or_else(|| env_parsed(ENV_DESCRIPTION_PREVIEW))
            .unwrap_or(100)
    }

    pub fn resolve_http_timeout(&self) -> Duration {
        let secs = self
            .http_timeout_secs
            .or_else(|| env_parsed(ENV_HTTP_TIMEOUT))
            .unwrap_or(30);
        Duration::from_secs(secs)
    }

    pub fn resolve_http_connect_timeout(&self) -> Duration {
        let secs = self
            .http_connect_timeout_secs
            .or_else(|| env_parsed(ENV_HTTP_CONNECT_TIMEOUT))
            .unwrap_or(10);
        Duration::from_secs(secs)
    }
}

/// Candidate config locations, first found wins:
/// 1. `SPA_SEARCH_CONFIG` env var path
/// 2. `./spa-search.json`
/// 3. `~/.spa-search/config.json`
pub fn config_candidates() -> Vec<PathBuf> {
    let mut v = vec![PathBuf::from("spa-search.json")];
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".spa-search").join("config.json"));
    }
    if let Some(env_path) = env_string(ENV_CONFIG_PATH) {
        v.insert(0, PathBuf::from(env_path));
    }
    v
}

/// Load `spa-search.json` from the standard locations.
///
/// Missing file → `SpaSearchConfig::default()` (silent, env-var fallbacks apply).
/// Parse error → log a warning, return `SpaSearchConfig::default()`.
pub fn load_config() -> SpaSearchConfig {
    load_config_from(&config_candidates())
}

pub fn load_config_from(candidates: &[PathBuf]) -> SpaSearchConfig {
    for path in candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return match parse_config(&contents) {
            Ok(cfg) => {
                tracing::info!("spa-search config loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    "spa-search config parse error at {}: {}; using defaults",
                    path.display(),
                    e
                );
                SpaSearchConfig::default()
            }
        };
    }
    SpaSearchConfig::default()
}

/// Strict variant for an explicitly requested file (`--config`): errors propagate.
pub fn load_config_file(path: &Path) -> anyhow::Result<SpaSearchConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
    parse_config(&contents).map_err(|e| anyhow::anyhow!("invalid {}: {}", path.display(), e))
}

fn parse_config(contents: &str) -> serde_json::Result<SpaSearchConfig> {
    serde_json::from_str(contents)
}

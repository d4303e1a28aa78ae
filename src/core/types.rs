use serde::{Deserialize, Serialize};

/// Which kind of entity a suggestion row points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    #[default]
    Spa,
    Service,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Spa => "spa",
            SuggestionKind::Service => "service",
        }
    }

    /// Bootstrap icon class used for the row.
    pub fn icon(&self) -> &'static str {
        match self {
            SuggestionKind::Spa => "bi-spa",
            SuggestionKind::Service => "bi-scissors",
        }
    }

    /// Full-search scope a selected row of this kind routes to.
    pub fn scope(&self) -> SearchScope {
        match self {
            SuggestionKind::Spa => SearchScope::All,
            SuggestionKind::Service => SearchScope::Service,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SuggestionItem {
    pub id: i64,
    /// Missing on older payloads; those rows are treated as spas.
    #[serde(rename = "type", default)]
    pub kind: SuggestionKind,
    pub name: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Service names that matched the query (service endpoint only).
    #[serde(default)]
    pub matching_services: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

/// `All` hits `/api/search?q=`, `Service` adds `&type=service`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchScope {
    #[default]
    All,
    Service,
}

impl SearchScope {
    pub fn type_param(&self) -> Option<&'static str> {
        match self {
            SearchScope::All => None,
            SearchScope::Service => Some("service"),
        }
    }
}

/// What a selected suggestion row hands to the full-search executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub scope: SearchScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_without_type_defaults_to_spa() {
        let item: SuggestionItem =
            serde_json::from_str(r#"{"id": 3, "name": "Lotus Spa", "area": "Kallio"}"#).unwrap();
        assert_eq!(item.kind, SuggestionKind::Spa);
        assert_eq!(item.area.as_deref(), Some("Kallio"));
        assert!(item.matching_services.is_none());
    }

    #[test]
    fn service_suggestion_parses_matching_services() {
        let item: SuggestionItem = serde_json::from_str(
            r#"{"id": 7, "type": "service", "name": "Harbor Spa", "area": null,
                "address": "Pier 2", "matching_services": ["Hot Stone", "Swedish"]}"#,
        )
        .unwrap();
        assert_eq!(item.kind, SuggestionKind::Service);
        assert_eq!(item.kind.scope(), SearchScope::Service);
        assert_eq!(
            item.matching_services,
            Some(vec!["Hot Stone".to_string(), "Swedish".to_string()])
        );
    }

    #[test]
    fn search_result_tolerates_extra_backend_fields() {
        let r: SearchResult = serde_json::from_str(
            r#"{"id": 1, "name": "Lotus", "description": null, "has_images": false,
                "services": ["Facial"], "image_url": "/static/uploads/a.jpg"}"#,
        )
        .unwrap();
        assert_eq!(r.services, vec!["Facial".to_string()]);
        assert!(r.phone.is_none());
    }
}

//! Fixture backend serving the four search endpoints from in-memory data.
//!
//! Run with `cargo run --features dev-tools --bin mock-backend -- --port 5000`
//! and point `spa-search --base-url http://127.0.0.1:5000` at it.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use spa_search::types::{SearchResult, SuggestionItem, SuggestionKind};
use tower_http::trace::TraceLayer;
use tracing::info;

const SUGGESTION_LIMIT: usize = 10;
const SEARCH_LIMIT: usize = 20;

struct Spa {
    id: i64,
    name: &'static str,
    area: &'static str,
    address: &'static str,
    description: &'static str,
    phone: &'static str,
    services: &'static [&'static str],
}

const SPAS: &[Spa] = &[
    Spa {
        id: 1,
        name: "Lotus Spa",
        area: "Kallio",
        address: "Helsinginkatu 4",
        description: "A calm neighbourhood spa focused on traditional massage and facials, with a small sauna suite and a tea lounge for after-treatment rest.",
        phone: "+358 40 100 2001",
        services: &["Swedish Massage", "Hot Stone", "Facial"],
    },
    Spa {
        id: 2,
        name: "Harbor Wellness",
        area: "Jätkäsaari",
        address: "Pier 2",
        description: "Seaside treatments.",
        phone: "",
        services: &["Hot Stone", "Body Scrub"],
    },
    Spa {
        id: 3,
        name: "Urban Glow",
        area: "Kamppi",
        address: "Annankatu 18",
        description: "",
        phone: "+358 40 100 2003",
        services: &["Honey Scrub", "Manicure", "Facial"],
    },
];

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default, rename = "type")]
    kind: String,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn spa_matches(spa: &Spa, q: &str) -> bool {
    [spa.name, spa.area, spa.description, spa.address]
        .iter()
        .any(|f| contains_ci(f, q))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn to_result(spa: &Spa) -> SearchResult {
    SearchResult {
        id: spa.id,
        name: spa.name.to_string(),
        description: non_empty(spa.description),
        image_url: None,
        area: non_empty(spa.area),
        phone: non_empty(spa.phone),
        address: non_empty(spa.address),
        services: spa.services.iter().map(|s| s.to_string()).collect(),
    }
}

async fn spa_suggestions(
    State(spas): State<&'static [Spa]>,
    Query(p): Query<SearchParams>,
) -> Json<Vec<SuggestionItem>> {
    let q = p.q.trim();
    if q.chars().count() < 2 {
        return Json(Vec::new());
    }
    let items = spas
        .iter()
        .filter(|s| spa_matches(s, q))
        .take(SUGGESTION_LIMIT)
        .map(|s| SuggestionItem {
            id: s.id,
            kind: SuggestionKind::Spa,
            name: s.name.to_string(),
            area: non_empty(s.area),
            address: non_empty(s.address),
            matching_services: None,
        })
        .collect();
    Json(items)
}

async fn service_suggestions(
    State(spas): State<&'static [Spa]>,
    Query(p): Query<SearchParams>,
) -> Json<Vec<SuggestionItem>> {
    let q = p.q.trim();
    if q.chars().count() < 2 {
        return Json(Vec::new());
    }

    // Limit applies to matching services, then they are grouped per spa.
    let mut budget = SUGGESTION_LIMIT;
    let mut items: Vec<SuggestionItem> = Vec::new();
    for spa in spas.iter() {
        let matching: Vec<String> = spa
            .services
            .iter()
            .filter(|name| contains_ci(name, q))
            .take(budget)
            .map(|s| s.to_string())
            .collect();
        if matching.is_empty() {
            continue;
        }
        budget -= matching.len();
        items.push(SuggestionItem {
            id: spa.id,
            kind: SuggestionKind::Service,
            name: spa.name.to_string(),
            area: non_empty(spa.area),
            address: non_empty(spa.address),
            matching_services: Some(matching),
        });
        if budget == 0 {
            break;
        }
    }
    Json(items)
}

async fn search(
    State(spas): State<&'static [Spa]>,
    Query(p): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
    let q = p.q.trim();
    if q.chars().count() < 2 {
        return Json(Vec::new());
    }
    let results = spas
        .iter()
        .filter(|s| {
            if p.kind == "service" {
                s.services.iter().any(|name| contains_ci(name, q))
            } else {
                spa_matches(s, q)
            }
        })
        .take(SEARCH_LIMIT)
        .map(to_result)
        .collect();
    Json(results)
}

fn parse_port_from_args() -> Option<u16> {
    let mut args = std::env::args();
    while let Some(a) = args.next() {
        if a == "--port" {
            if let Some(v) = args.next() {
                if let Ok(p) = v.parse::<u16>() {
                    return Some(p);
                }
            }
        } else if let Some(rest) = a.strip_prefix("--port=") {
            if let Ok(p) = rest.parse::<u16>() {
                return Some(p);
            }
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let app = Router::new()
        .route("/api/search/suggestions", get(spa_suggestions))
        .route("/api/search/services", get(service_suggestions))
        .route("/api/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(SPAS);

    let port = parse_port_from_args()
        .or_else(|| std::env::var("PORT").ok()?.trim().parse().ok())
        .unwrap_or(5000);
    let bind_addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("mock search backend listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

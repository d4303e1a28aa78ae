//! Suggestion dropdown markup and row selection.

use crate::types::{SearchRequest, SuggestionItem, SuggestionKind};

use super::highlight::{escape_html, highlight_match};

pub const NO_MATCHES_MESSAGE: &str = "No matching spas or services found";
const SERVICES_PREFIX: &str = "Services:";

/// `Services: Hot Stone, Swedish` for rows that carry matching services.
pub fn services_label(item: &SuggestionItem) -> Option<String> {
    let services = item.matching_services.as_ref()?;
    if services.is_empty() {
        return None;
    }
    Some(format!("{} {}", SERVICES_PREFIX, services.join(", ")))
}

/// First service name in a `Services: a, b` label.
pub fn first_listed_service(label: &str) -> Option<String> {
    let list = label.trim();
    let list = list.strip_prefix(SERVICES_PREFIX).unwrap_or(list);
    let first = list.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// The search a click on this row triggers.
///
/// Service rows search for their first matching service; spa rows (and
/// service rows without a services label) search for the spa name.
pub fn selection_request(item: &SuggestionItem) -> SearchRequest {
    let service_term = match item.kind {
        SuggestionKind::Service => services_label(item).and_then(|l| first_listed_service(&l)),
        SuggestionKind::Spa => None,
    };
    SearchRequest {
        query: service_term.unwrap_or_else(|| item.name.trim().to_string()),
        scope: item.kind.scope(),
    }
}

pub fn render_no_matches() -> String {
    format!("<div class=\"no-results\">{}</div>", NO_MATCHES_MESSAGE)
}

pub fn render_suggestions(items: &[SuggestionItem], query: &str) -> String {
    if items.is_empty() {
        return render_no_matches();
    }

    let mut html = format!(
        "<div class=\"search-result-count\">{} results found</div>",
        items.len()
    );
    for item in items {
        html.push_str(&render_row(item, query));
    }
    html
}

fn render_row(item: &SuggestionItem, query: &str) -> String {
    let kind = item.kind.as_str();
    let meta = format!(
        "{} • {}",
        escape_html(item.area.as_deref().unwrap_or("")),
        escape_html(item.address.as_deref().unwrap_or(""))
    );
    let services = services_label(item)
        .map(|l| format!("<small class=\"text-muted\">{}</small>", escape_html(&l)))
        .unwrap_or_default();

    format!(
        concat!(
            "<div class=\"search-suggestion-item\" data-item-id=\"{id}\" data-item-type=\"{kind}\">",
            "<i class=\"bi {icon}\"></i>",
            "<div><div>{name}</div><small class=\"text-muted\">{meta}</small>{services}</div>",
            "<span class=\"search-category\">{kind}</span>",
            "</div>"
        ),
        id = item.id,
        kind = kind,
        icon = item.kind.icon(),
        name = highlight_match(&item.name, query),
        meta = meta,
        services = services,
    )
}

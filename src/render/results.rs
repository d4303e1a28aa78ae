//! Result grid and empty-state markup.

use crate::core::config::{SpaSearchConfig, DEFAULT_IMAGE_URL};
use crate::types::SearchResult;

use super::highlight::escape_html;

#[derive(Debug, Clone)]
pub struct CardOptions {
    pub default_image_url: String,
    pub description_preview_chars: usize,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            description_preview_chars: 100,
        }
    }
}

impl CardOptions {
    pub fn from_config(config: &SpaSearchConfig) -> Self {
        Self {
            default_image_url: config.resolve_default_image_url(),
            description_preview_chars: config.resolve_description_preview_chars(),
        }
    }
}

/// First `max` characters, plus `...` when anything was cut.
pub fn truncate_description(desc: &str, max: usize) -> String {
    let mut chars = desc.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn render_empty_state(query: &str) -> String {
    format!(
        concat!(
            "<div class=\"col-12 text-center py-5\">",
            "<i class=\"bi bi-search\" style=\"font-size: 3rem; color: #ccc;\"></i>",
            "<h3 class=\"mt-3\">No results found for \"{}\"</h3>",
            "<p>Try different keywords or browse all our spas</p>",
            "</div>"
        ),
        escape_html(query)
    )
}

pub fn render_results(results: &[SearchResult], query: &str, opts: &CardOptions) -> String {
    if results.is_empty() {
        return render_empty_state(query);
    }
    results.iter().map(|r| render_card(r, opts)).collect()
}

fn render_card(spa: &SearchResult, opts: &CardOptions) -> String {
    let image = spa
        .image_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(opts.default_image_url.as_str());
    let description = match spa.description.as_deref() {
        Some(d) if !d.is_empty() => truncate_description(d, opts.description_preview_chars),
        _ => "No description available".to_string(),
    };
    let name = escape_html(&spa.name);
    let area = spa
        .area
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Unknown area");
    let phone = spa
        .phone
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or("No phone");

    format!(
        concat!(
            "<div class=\"col-lg-4 col-md-6 spa-card\" id=\"spa-{id}\">",
            "<div class=\"spa-card\">",
            "<div class=\"spa-image-container\"><img src=\"{image}\" alt=\"{name}\"></div>",
            "<div class=\"spa-card-content\">",
            "<h5 class=\"card-title mt-3\">{name}</h5>",
            "<p class=\"spa-description\">{description}</p>",
            "<div class=\"mb-2\"><small class=\"text-muted\"><i class=\"bi bi-geo-alt\"></i> {area}</small></div>",
            "<div class=\"mb-2\"><small class=\"text-muted\"><i class=\"bi bi-telephone\"></i> {phone}</small></div>",
            "<div class=\"spa-card-actions\"><a class=\"btn view-details-btn\" href=\"/spa/{id}\">View Details</a></div>",
            "</div></div></div>"
        ),
        id = spa.id,
        image = escape_html(image),
        name = name,
        description = escape_html(&description),
        area = escape_html(area),
        phone = escape_html(phone),
    )
}

//! The presentation surface the search session drives.
//!
//! A host (browser bridge, terminal, test) implements [`SearchView`] over
//! whatever elements it owns: the text input, the suggestion container,
//! the results section, and the three default-listing regions.

use std::sync::Mutex;

pub trait SearchView: Send + Sync {
    /// Write into the search text field.
    fn set_query_text(&self, text: &str);
    /// Replace the dropdown contents and mark the search control active.
    fn show_suggestions(&self, html: &str);
    /// Close the dropdown.
    fn hide_suggestions(&self);
    /// Show the results section with this grid markup.
    fn show_results(&self, html: &str);
    fn hide_results(&self);
    /// Toggle the default grid, carousel and section heading together.
    fn set_default_listing_visible(&self, visible: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub query_text: String,
    pub suggestions_html: String,
    pub suggestions_active: bool,
    pub results_html: String,
    pub results_visible: bool,
    pub listing_grid_visible: bool,
    pub listing_carousel_visible: bool,
    pub listing_heading_visible: bool,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            suggestions_html: String::new(),
            suggestions_active: false,
            results_html: String::new(),
            results_visible: false,
            listing_grid_visible: true,
            listing_carousel_visible: true,
            listing_heading_visible: true,
        }
    }
}

impl ViewSnapshot {
    pub fn default_listing_visible(&self) -> bool {
        self.listing_grid_visible && self.listing_carousel_visible && self.listing_heading_visible
    }
}

/// In-memory view; records state instead of touching a real document.
#[derive(Debug, Default)]
pub struct SnapshotView {
    state: Mutex<ViewSnapshot>,
}

impl SnapshotView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.with(|s| s.clone())
    }

    fn with<R>(&self, f: impl FnOnce(&mut ViewSnapshot) -> R) -> R {
        // A panic while holding the lock leaves plain data behind; keep going.
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl SearchView for SnapshotView {
    fn set_query_text(&self, text: &str) {
        self.with(|s| s.query_text = text.to_string());
    }

    fn show_suggestions(&self, html: &str) {
        self.with(|s| {
            s.suggestions_html = html.to_string();
            s.suggestions_active = true;
        });
    }

    fn hide_suggestions(&self) {
        self.with(|s| s.suggestions_active = false);
    }

    fn show_results(&self, html: &str) {
        self.with(|s| {
            s.results_html = html.to_string();
            s.results_visible = true;
        });
    }

    fn hide_results(&self) {
        self.with(|s| s.results_visible = false);
    }

    fn set_default_listing_visible(&self, visible: bool) {
        self.with(|s| {
            s.listing_grid_visible = visible;
            s.listing_carousel_visible = visible;
            s.listing_heading_visible = visible;
        });
    }
}

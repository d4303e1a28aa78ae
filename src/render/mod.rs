pub mod highlight;
pub mod results;
pub mod suggestions;

pub use highlight::{escape_html, escape_regex, highlight_match};
pub use results::{render_empty_state, render_results, truncate_description, CardOptions};
pub use suggestions::{render_suggestions, selection_request, NO_MATCHES_MESSAGE};

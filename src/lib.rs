pub mod core;
pub mod features;
pub mod render;
pub mod tools;

// --- Primary core exports ---
pub use core::config;
pub use core::types;
pub use core::types::*;
pub use core::{AppState, FetchError};

// --- Flat module paths ---
pub use features::{debounce, sequence, session, view};
pub use tools::search;

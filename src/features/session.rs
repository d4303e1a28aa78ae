//! Per-page search session: keystrokes → suggestions → selection/submit → results.
//!
//! Phases: `Idle → Suggesting → (Selecting | Submitting) → Displaying → Idle`
//! (the last step only through [`SearchSession::clear`]). `Suggesting`
//! re-enters itself on every debounced keystroke.

use crate::core::config::SpaSearchConfig;
use crate::render::{render_results, render_suggestions, selection_request, CardOptions};
use crate::tools::search::{fetch_suggestions, run_selected, run_submitted, SearchBackend};
use crate::types::{SearchRequest, SearchResult, SuggestionItem};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::sequence::{RequestSequence, Ticket};
use super::view::SearchView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
    Results(usize),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Suggesting,
    Selecting,
    Submitting,
    Displaying(DisplayOutcome),
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub cards: CardOptions,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
            cards: CardOptions::default(),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &SpaSearchConfig) -> Self {
        Self {
            debounce: config.resolve_debounce(),
            min_query_chars: config.resolve_min_query_chars(),
            cards: CardOptions::from_config(config),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    phase: SessionPhase,
    suggestions_open: bool,
    // Rows currently rendered in the dropdown, in display order.
    rows: Vec<SuggestionItem>,
}

impl SessionState {
    fn close_suggestions(&mut self) {
        self.suggestions_open = false;
        if self.phase == SessionPhase::Suggesting {
            self.phase = SessionPhase::Idle;
        }
    }
}

struct SessionCore {
    backend: Arc<dyn SearchBackend>,
    view: Arc<dyn SearchView>,
    settings: SessionSettings,
    suggestion_seq: RequestSequence,
    search_seq: RequestSequence,
    // Ticket checks and view writes happen under this lock.
    state: Mutex<SessionState>,
}

impl SessionCore {
    /// Debounced keystroke. `ticket` was issued when the key arrived, so any
    /// submit, selection, clear or dismiss since then has made it stale.
    async fn on_quiet_input(&self, query: &str, ticket: Ticket) {
        if !self.suggestion_seq.is_current(ticket) {
            debug!("keystroke {:?} superseded before it fired", query);
            return;
        }
        self.suggest_with(ticket, query).await;
    }

    async fn suggest(&self, query: &str) {
        let ticket = self.suggestion_seq.issue();
        self.suggest_with(ticket, query).await;
    }

    async fn suggest_with(&self, ticket: Ticket, query: &str) {
        if query.chars().count() < self.settings.min_query_chars {
            let mut state = self.state.lock().await;
            if self.suggestion_seq.is_current(ticket) {
                self.suggestion_seq.invalidate();
                self.view.hide_suggestions();
                state.close_suggestions();
            }
            return;
        }

        let fetched = fetch_suggestions(self.backend.as_ref(), query).await;

        let mut state = self.state.lock().await;
        if !self.suggestion_seq.is_current(ticket) {
            debug!(
                "dropping stale suggestions for {:?} (ticket {})",
                query,
                ticket.value()
            );
            return;
        }

        match fetched {
            Ok(items) => {
                self.view.show_suggestions(&render_suggestions(&items, query));
                state.rows = items;
                state.suggestions_open = true;
                state.phase = SessionPhase::Suggesting;
            }
            Err(e) => {
                warn!("suggestions for {:?} failed: {}", query, e);
                self.view.hide_suggestions();
                state.rows.clear();
                state.close_suggestions();
            }
        }
    }

    async fn select(&self, index: usize) -> Option<SearchRequest> {
        let (request, ticket) = {
            let mut state = self.state.lock().await;
            if !state.suggestions_open {
                return None;
            }
            let request = selection_request(state.rows.get(index)?);
            self.suggestion_seq.invalidate();
            self.view.set_query_text(&request.query);
            self.view.hide_suggestions();
            state.suggestions_open = false;
            state.phase = SessionPhase::Selecting;
            (request, self.search_seq.issue())
        };

        debug!("selected row {} → {:?}", index, request);
        let results = run_selected(self.backend.as_ref(), &request).await;
        self.display(ticket, &request.query, results).await;
        Some(request)
    }

    async fn submit(&self, query: &str) -> Option<DisplayOutcome> {
        let ticket = {
            let mut state = self.state.lock().await;
            self.suggestion_seq.invalidate();
            self.view.hide_suggestions();
            state.suggestions_open = false;
            state.phase = SessionPhase::Submitting;
            self.search_seq.issue()
        };

        let results = run_submitted(self.backend.as_ref(), query).await;
        self.display(ticket, query, results).await
    }

    async fn display(
        &self,
        ticket: Ticket,
        query: &str,
        results: Vec<SearchResult>,
    ) -> Option<DisplayOutcome> {
        let mut state = self.state.lock().await;
        if !self.search_seq.is_current(ticket) {
            debug!("dropping stale results for {:?}", query);
            return None;
        }

        self.view
            .show_results(&render_results(&results, query, &self.settings.cards));
        self.view.set_default_listing_visible(false);

        let outcome = if results.is_empty() {
            DisplayOutcome::Empty
        } else {
            DisplayOutcome::Results(results.len())
        };
        info!("search {:?}: {:?}", query, outcome);
        state.phase = SessionPhase::Displaying(outcome);
        Some(outcome)
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;
        self.suggestion_seq.invalidate();
        self.search_seq.invalidate();
        self.view.hide_suggestions();
        self.view.hide_results();
        self.view.set_default_listing_visible(true);
        state.rows.clear();
        state.suggestions_open = false;
        state.phase = SessionPhase::Idle;
    }

    async fn dismiss(&self) {
        let mut state = self.state.lock().await;
        self.suggestion_seq.invalidate();
        self.view.hide_suggestions();
        state.close_suggestions();
    }
}

/// One search box and everything it drives. Create one per page/flow and
/// drop it when the flow ends.
pub struct SearchSession {
    core: Arc<SessionCore>,
    watcher: Debouncer<(String, Ticket)>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("settings", &self.core.settings)
            .field("watcher", &self.watcher)
            .finish()
    }
}

impl SearchSession {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        view: Arc<dyn SearchView>,
        settings: SessionSettings,
    ) -> Self {
        let debounce = settings.debounce;
        let core = Arc::new(SessionCore {
            backend,
            view,
            settings,
            suggestion_seq: RequestSequence::new(),
            search_seq: RequestSequence::new(),
            state: Mutex::new(SessionState::default()),
        });

        let handler_core = Arc::clone(&core);
        let watcher = Debouncer::new(debounce, move |(query, ticket): (String, Ticket)| {
            let core = Arc::clone(&handler_core);
            async move { core.on_quiet_input(&query, ticket).await }
        });

        Self { core, watcher }
    }

    /// Text-field input event. Emptying the field restores the default
    /// listing right away; suggestion work waits for the debounce window.
    pub async fn on_input(&self, raw: &str) {
        let query = raw.trim().to_string();
        if query.is_empty() {
            self.core.clear().await;
        }
        let ticket = self.core.suggestion_seq.issue();
        self.watcher.call((query, ticket));
    }

    /// Fetch and show suggestions now, bypassing the debounce window. Queries
    /// shorter than the minimum hide the dropdown instead.
    pub async fn suggest(&self, query: &str) {
        self.core.suggest(query.trim()).await;
    }

    /// Click on the suggestion row at `index` (display order). Returns the
    /// search it triggered, or `None` when no such row is showing.
    pub async fn select(&self, index: usize) -> Option<SearchRequest> {
        self.core.select(index).await
    }

    /// Form submission. Blank queries are ignored. `None` also means a newer
    /// search superseded this one before it finished.
    pub async fn submit(&self, raw: &str) -> Option<DisplayOutcome> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }
        self.core.submit(query).await
    }

    /// Query cleared: back to the default listing.
    pub async fn clear(&self) {
        self.core.clear().await;
    }

    /// Click outside the search control.
    pub async fn dismiss(&self) {
        self.core.dismiss().await;
    }

    pub async fn phase(&self) -> SessionPhase {
        self.core.state.lock().await.phase
    }

    pub async fn suggestion_rows(&self) -> Vec<SuggestionItem> {
        self.core.state.lock().await.rows.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::features::view::SnapshotView;
    use crate::render::NO_MATCHES_MESSAGE;
    use crate::tools::search::SuggestionSource;
    use crate::types::{SearchScope, SuggestionKind};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::time::sleep;

    #[derive(Default)]
    struct FakeBackend {
        delays: HashMap<String, Duration>,
        failing: Vec<String>,
        results: HashMap<(String, SearchScope), Vec<SearchResult>>,
        suggest_calls: std::sync::Mutex<Vec<(SuggestionSource, String)>>,
        search_calls: std::sync::Mutex<Vec<(String, SearchScope)>>,
    }

    impl FakeBackend {
        async fn pause_for(&self, query: &str) {
            if let Some(d) = self.delays.get(query) {
                sleep(*d).await;
            }
        }
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn suggest(
            &self,
            source: SuggestionSource,
            query: &str,
        ) -> Result<Vec<SuggestionItem>, FetchError> {
            self.suggest_calls
                .lock()
                .unwrap()
                .push((source, query.to_string()));
            self.pause_for(query).await;
            if self.failing.iter().any(|q| q == query) {
                return Err(FetchError::Transport("connection reset".into()));
            }
            if query == "zz" {
                return Ok(Vec::new());
            }
            Ok(match source {
                SuggestionSource::Spas => vec![SuggestionItem {
                    id: 1,
                    name: format!("{} Retreat", query),
                    ..Default::default()
                }],
                SuggestionSource::Services => vec![SuggestionItem {
                    id: 2,
                    kind: SuggestionKind::Service,
                    name: "Harbor Spa".into(),
                    matching_services: Some(vec!["Hot Stone".into(), "Swedish".into()]),
                    ..Default::default()
                }],
            })
        }

        async fn search(
            &self,
            query: &str,
            scope: SearchScope,
        ) -> Result<Vec<SearchResult>, FetchError> {
            self.search_calls
                .lock()
                .unwrap()
                .push((query.to_string(), scope));
            self.pause_for(query).await;
            Ok(self
                .results
                .get(&(query.to_string(), scope))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn spa(id: i64, name: &str) -> SearchResult {
        SearchResult {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    fn session_with(backend: FakeBackend) -> (SearchSession, Arc<FakeBackend>, Arc<SnapshotView>) {
        let backend = Arc::new(backend);
        let view = Arc::new(SnapshotView::new());
        let session = SearchSession::new(
            backend.clone(),
            view.clone(),
            SessionSettings::default(),
        );
        (session, backend, view)
    }

    #[tokio::test(start_paused = true)]
    async fn short_queries_never_fetch() {
        let (session, backend, view) = session_with(FakeBackend::default());

        session.on_input("a").await;
        sleep(Duration::from_millis(400)).await;

        assert!(backend.suggest_calls.lock().unwrap().is_empty());
        assert!(!view.snapshot().suggestions_active);
        assert_eq!(session.phase().await, SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_burst_fetches_once_with_last_query() {
        let (session, backend, view) = session_with(FakeBackend::default());

        for q in ["l", "lo", "lot", "lotu"] {
            session.on_input(q).await;
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_millis(250)).await;

        let calls = backend.suggest_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, q)| q == "lotu"));
        assert!(view.snapshot().suggestions_active);
        assert_eq!(session.phase().await, SessionPhase::Suggesting);
    }

    #[tokio::test(start_paused = true)]
    async fn slower_earlier_response_never_overwrites_newer_one() {
        let backend = FakeBackend {
            delays: HashMap::from([
                ("lo".to_string(), Duration::from_millis(500)),
                ("lotus".to_string(), Duration::from_millis(50)),
            ]),
            ..Default::default()
        };
        let (session, _backend, view) = session_with(backend);

        // "lo" is issued first but resolves last.
        tokio::join!(session.suggest("lo"), session.suggest("lotus"));

        let rows = session.suggestion_rows().await;
        assert_eq!(rows[0].name, "lotus Retreat");
        let html = view.snapshot().suggestions_html;
        assert!(html.contains("<mark>lotus</mark> Retreat"));
        assert!(!html.contains("<mark>lo</mark> Retreat"));
    }

    #[tokio::test]
    async fn failed_fetch_hides_open_suggestions() {
        let backend = FakeBackend {
            failing: vec!["boom".to_string()],
            ..Default::default()
        };
        let (session, _backend, view) = session_with(backend);

        session.suggest("spa").await;
        assert!(view.snapshot().suggestions_active);

        session.suggest("boom").await;
        let snap = view.snapshot();
        assert!(!snap.suggestions_active);
        assert!(snap.results_html.is_empty());
        assert_eq!(session.phase().await, SessionPhase::Idle);
    }

    #[tokio::test]
    async fn no_matches_still_opens_dropdown() {
        let (session, _backend, view) = session_with(FakeBackend::default());
        session.suggest("zz").await;
        let snap = view.snapshot();
        assert!(snap.suggestions_active);
        assert!(snap.suggestions_html.contains(NO_MATCHES_MESSAGE));
    }

    #[tokio::test]
    async fn service_row_click_searches_first_matching_service() {
        let backend = FakeBackend {
            results: HashMap::from([(
                ("Hot Stone".to_string(), SearchScope::Service),
                vec![spa(2, "Harbor Spa")],
            )]),
            ..Default::default()
        };
        let (session, backend, view) = session_with(backend);

        session.suggest("stone").await;
        let request = session.select(1).await.expect("row 1 is showing");

        assert_eq!(request.query, "Hot Stone");
        assert_eq!(request.scope, SearchScope::Service);
        assert_eq!(
            *backend.search_calls.lock().unwrap(),
            vec![("Hot Stone".to_string(), SearchScope::Service)]
        );
        let snap = view.snapshot();
        assert_eq!(snap.query_text, "Hot Stone");
        assert!(!snap.suggestions_active);
        assert!(snap.results_html.contains("Harbor Spa"));
        assert_eq!(
            session.phase().await,
            SessionPhase::Displaying(DisplayOutcome::Results(1))
        );
    }

    #[tokio::test]
    async fn spa_row_click_searches_unscoped_by_name() {
        let (session, backend, _view) = session_with(FakeBackend::default());
        session.suggest("lotus").await;
        let request = session.select(0).await.unwrap();
        assert_eq!(request.query, "lotus Retreat");
        assert_eq!(
            *backend.search_calls.lock().unwrap(),
            vec![("lotus Retreat".to_string(), SearchScope::All)]
        );
    }

    #[tokio::test]
    async fn selection_requires_visible_row() {
        let (session, backend, _view) = session_with(FakeBackend::default());
        assert!(session.select(0).await.is_none());

        session.suggest("lotus").await;
        session.dismiss().await;
        assert!(session.select(0).await.is_none());
        assert!(backend.search_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_falls_back_to_unscoped_and_renders() {
        let backend = FakeBackend {
            results: HashMap::from([(
                ("massage".to_string(), SearchScope::All),
                vec![spa(4, "Massage Corner")],
            )]),
            ..Default::default()
        };
        let (session, backend, view) = session_with(backend);

        let outcome = session.submit("  massage ").await;

        assert_eq!(outcome, Some(DisplayOutcome::Results(1)));
        assert_eq!(
            *backend.search_calls.lock().unwrap(),
            vec![
                ("massage".to_string(), SearchScope::Service),
                ("massage".to_string(), SearchScope::All)
            ]
        );
        let snap = view.snapshot();
        assert!(snap.results_visible);
        assert!(snap.results_html.contains("Massage Corner"));
        assert!(!snap.default_listing_visible());
    }

    #[tokio::test]
    async fn zero_results_show_empty_state_and_clear_restores_listing() {
        let (session, _backend, view) = session_with(FakeBackend::default());

        let outcome = session.submit("nothing here").await;
        assert_eq!(outcome, Some(DisplayOutcome::Empty));
        let snap = view.snapshot();
        assert!(snap
            .results_html
            .contains("No results found for \"nothing here\""));
        assert!(!snap.default_listing_visible());

        session.on_input("   ").await;
        let snap = view.snapshot();
        assert!(snap.default_listing_visible());
        assert!(!snap.results_visible);
        assert_eq!(session.phase().await, SessionPhase::Idle);
    }

    #[tokio::test]
    async fn blank_submit_is_ignored() {
        let (session, backend, _view) = session_with(FakeBackend::default());
        assert_eq!(session.submit("   ").await, None);
        assert!(backend.search_calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_search_is_not_rendered() {
        let backend = FakeBackend {
            delays: HashMap::from([("slow spa".to_string(), Duration::from_millis(500))]),
            results: HashMap::from([
                (("slow spa".to_string(), SearchScope::All), vec![spa(1, "Slow One")]),
                (("fast spa".to_string(), SearchScope::All), vec![spa(2, "Fast One")]),
            ]),
            ..Default::default()
        };
        let (session, _backend, view) = session_with(backend);

        let (slow, fast) = tokio::join!(session.submit("slow spa"), session.submit("fast spa"));

        assert_eq!(slow, None);
        assert_eq!(fast, Some(DisplayOutcome::Results(1)));
        let html = view.snapshot().results_html;
        assert!(html.contains("Fast One"));
        assert!(!html.contains("Slow One"));
    }

    #[tokio::test]
    async fn immediate_suggest_ignores_short_queries() {
        let (session, backend, view) = session_with(FakeBackend::default());

        session.suggest("lotus").await;
        assert!(view.snapshot().suggestions_active);

        session.suggest("a").await;
        session.suggest("   ").await;

        let calls = backend.suggest_calls.lock().unwrap().clone();
        assert!(calls.iter().all(|(_, q)| q == "lotus"));
        assert!(!view.snapshot().suggestions_active);
        assert_eq!(session.phase().await, SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_keystroke_does_not_reopen_dropdown_after_submit() {
        let backend = FakeBackend {
            results: HashMap::from([(
                ("lotus".to_string(), SearchScope::Service),
                vec![spa(1, "Lotus Spa")],
            )]),
            ..Default::default()
        };
        let (session, backend, view) = session_with(backend);

        session.on_input("lotus").await;
        sleep(Duration::from_millis(50)).await;
        let outcome = session.submit("lotus").await;
        sleep(Duration::from_millis(400)).await;

        assert_eq!(outcome, Some(DisplayOutcome::Results(1)));
        assert!(backend.suggest_calls.lock().unwrap().is_empty());
        let snap = view.snapshot();
        assert!(snap.results_visible);
        assert!(!snap.suggestions_active);
        assert_eq!(
            session.phase().await,
            SessionPhase::Displaying(DisplayOutcome::Results(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn queued_keystroke_does_not_reopen_dismissed_dropdown() {
        let (session, backend, view) = session_with(FakeBackend::default());

        session.on_input("lotus").await;
        sleep(Duration::from_millis(100)).await;
        session.dismiss().await;
        sleep(Duration::from_millis(400)).await;

        assert!(backend.suggest_calls.lock().unwrap().is_empty());
        assert!(!view.snapshot().suggestions_active);
        assert_eq!(session.phase().await, SessionPhase::Idle);
    }
}

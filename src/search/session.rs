use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::filter::canonical_city;
use super::matcher::searchable_query;
use super::state::{FilterState, ALL};

/// Settle delay for search-as-you-type
pub const LIVE_SEARCH_DELAY: Duration = Duration::from_millis(500);

/// User interactions a session reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Text typed into the search box
    QueryInput(String),
    /// Search button or Enter
    Submit(String),
    /// City key such as `malmo`, or `all`
    CitySelected(String),
    /// Seating feature tag, or `all`
    FeatureSelected(String),
    /// Specialty tag, or `all`
    SpecialtySelected(String),
    PageSelected(usize),
    Reset,
}

/// What the caller should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    /// Run the search now
    Run,
    /// Run the search once typing settles
    RunDebounced,
    /// Empty the results area
    Clear,
    /// Show the default / featured view
    ShowDefault,
    Ignore,
}

/// Identifies one issued search request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Filter state of one visitor plus the latest-request guard
#[derive(Debug, Default)]
pub struct SearchSession {
    state: FilterState,
    last_ticket: u64,
}

impl SearchSession {
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            last_ticket: 0,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn handle(&mut self, event: SearchEvent) -> SearchAction {
        match event {
            SearchEvent::QueryInput(text) => self.on_query_input(&text),
            SearchEvent::Submit(text) => self.on_submit(&text),
            SearchEvent::CitySelected(key) => self.on_city_selected(&key),
            SearchEvent::FeatureSelected(tag) => self.on_feature_selected(&tag),
            SearchEvent::SpecialtySelected(tag) => self.on_specialty_selected(&tag),
            SearchEvent::PageSelected(page) => self.on_page_selected(page),
            SearchEvent::Reset => self.reset(),
        }
    }

    pub fn on_query_input(&mut self, text: &str) -> SearchAction {
        let trimmed = text.trim();
        if let Some(query) = searchable_query(trimmed) {
            self.state.query = query.to_string();
            self.state.page = 1;
            SearchAction::RunDebounced
        } else if trimmed.is_empty() {
            self.state.query.clear();
            self.state.page = 1;
            SearchAction::Clear
        } else {
            SearchAction::Ignore
        }
    }

    pub fn on_submit(&mut self, text: &str) -> SearchAction {
        self.state.query = searchable_query(text).unwrap_or_default().to_string();
        self.state.page = 1;
        self.run_or(SearchAction::Clear)
    }

    pub fn on_city_selected(&mut self, key: &str) -> SearchAction {
        self.state.page = 1;
        if key.trim() == ALL {
            self.state.city.clear();
            return SearchAction::ShowDefault;
        }
        self.state.city = canonical_city(key);
        self.run_or(SearchAction::Clear)
    }

    pub fn on_feature_selected(&mut self, tag: &str) -> SearchAction {
        Self::select_tag(&mut self.state.feature, tag);
        self.state.page = 1;
        self.tag_action(tag)
    }

    pub fn on_specialty_selected(&mut self, tag: &str) -> SearchAction {
        Self::select_tag(&mut self.state.specialty, tag);
        self.state.page = 1;
        self.tag_action(tag)
    }

    pub fn on_page_selected(&mut self, page: usize) -> SearchAction {
        if page == 0 || !self.state.has_active_filters() {
            return SearchAction::Ignore;
        }
        self.state.page = page;
        SearchAction::Run
    }

    pub fn reset(&mut self) -> SearchAction {
        self.state.reset();
        SearchAction::ShowDefault
    }

    /// Issues the ticket for a new request, superseding older ones
    pub fn begin_request(&mut self) -> RequestTicket {
        self.last_ticket += 1;
        RequestTicket(self.last_ticket)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.last_ticket
    }

    /// Passes the response through only if no newer request was issued
    pub fn accept<T>(&self, ticket: RequestTicket, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            debug!(
                "Dropping stale response for request {} (latest is {})",
                ticket.0, self.last_ticket
            );
            None
        }
    }

    fn select_tag(slot: &mut String, tag: &str) {
        let tag = tag.trim();
        if tag == ALL {
            slot.clear();
        } else {
            *slot = tag.to_string();
        }
    }

    fn tag_action(&self, tag: &str) -> SearchAction {
        if tag.trim() == ALL {
            SearchAction::ShowDefault
        } else {
            self.run_or(SearchAction::Clear)
        }
    }

    fn run_or(&self, otherwise: SearchAction) -> SearchAction {
        if self.state.has_active_filters() {
            SearchAction::Run
        } else {
            otherwise
        }
    }
}

/// Delays a job until input has been quiet for a while
///
/// Scheduling a new job aborts the pending one.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Must be called from within a tokio runtime
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(LIVE_SEARCH_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Controller-owned state shared by the search controller and the pipeline.
//!
//! All mutation goes through the transition methods on [`Session`]. Async
//! work takes a [`Ticket`] when it starts and hands it back when it finishes;
//! results carrying an outdated ticket are dropped, so a slow stale response
//! can never overwrite a newer one.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::model::{LocationCandidate, WeatherRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Searching,
    Loading,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Suggesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Lookup,
    Forecast,
}

/// User-visible, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn lookup(err: &impl std::fmt::Display) -> Self {
        Self {
            kind: NoticeKind::Lookup,
            message: format!("Could not search locations: {err}"),
        }
    }

    pub fn forecast(err: &impl std::fmt::Display) -> Self {
        Self {
            kind: NoticeKind::Forecast,
            message: format!("Could not load weather: {err}"),
        }
    }
}

/// The place a record was loaded for, split for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedPlace {
    pub city: String,
    pub qualifier: Option<String>,
}

impl SelectedPlace {
    pub fn from_candidate(candidate: &LocationCandidate) -> Self {
        Self {
            city: candidate.city_name().to_string(),
            qualifier: candidate.qualifier().map(str::to_string),
        }
    }
}

/// Sequence number of an in-flight lookup or pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
pub struct Session {
    query: String,
    phase: SearchPhase,
    suggestions: Vec<LocationCandidate>,
    view: ViewState,
    // Record and place are only ever replaced together.
    record: Option<Arc<WeatherRecord>>,
    place: Option<SelectedPlace>,
    notice: Option<Notice>,
    search_seq: u64,
    load_seq: u64,
}

impl Session {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Suggestions currently shown; empty while the list is closed.
    pub fn visible_suggestions(&self) -> &[LocationCandidate] {
        match self.phase {
            SearchPhase::Suggesting => &self.suggestions,
            SearchPhase::Idle => &[],
        }
    }

    /// Place of the current record.
    pub fn selected(&self) -> Option<&SelectedPlace> {
        self.place.as_ref()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn record(&self) -> Option<&Arc<WeatherRecord>> {
        self.record.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn dismiss_notice(&mut self, kind: NoticeKind) {
        if self.notice.as_ref().is_some_and(|n| n.kind == kind) {
            self.notice = None;
        }
    }

    // --- search transitions ---

    /// Store new input text and invalidate every earlier lookup.
    pub fn begin_search(&mut self, text: &str) -> Ticket {
        self.query = text.to_string();
        self.search_seq += 1;
        self.dismiss_notice(NoticeKind::Lookup);
        Ticket(self.search_seq)
    }

    pub fn is_current_search(&self, ticket: Ticket) -> bool {
        ticket.0 == self.search_seq
    }

    /// Clear the list and go idle. Stored text is kept.
    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.phase = SearchPhase::Idle;
    }

    /// Apply lookup results if `ticket` is still the latest search.
    pub fn show_suggestions(&mut self, ticket: Ticket, candidates: Vec<LocationCandidate>) -> bool {
        if !self.is_current_search(ticket) {
            return false;
        }
        self.suggestions = candidates;
        self.phase = SearchPhase::Suggesting;
        self.dismiss_notice(NoticeKind::Lookup);
        true
    }

    /// Record a failed lookup if `ticket` is still the latest search.
    pub fn fail_search(&mut self, ticket: Ticket, notice: Notice) -> bool {
        if !self.is_current_search(ticket) {
            return false;
        }
        self.clear_suggestions();
        self.notice = Some(notice);
        true
    }

    /// Close the list; lookups still in flight will not reopen it.
    pub fn close_suggestions(&mut self) {
        self.search_seq += 1;
        self.phase = SearchPhase::Idle;
    }

    // --- view transitions ---

    /// Enter `Loading` and supersede any earlier run.
    pub fn begin_loading(&mut self) -> Ticket {
        self.load_seq += 1;
        self.view = ViewState::Loading;
        self.dismiss_notice(NoticeKind::Forecast);
        Ticket(self.load_seq)
    }

    pub fn is_current_load(&self, ticket: Ticket) -> bool {
        ticket.0 == self.load_seq
    }

    /// Replace record and place and show the dashboard if `ticket` is still current.
    pub fn commit_record(
        &mut self,
        ticket: Ticket,
        record: WeatherRecord,
        place: SelectedPlace,
    ) -> bool {
        if !self.is_current_load(ticket) {
            return false;
        }
        self.record = Some(Arc::new(record));
        self.place = Some(place);
        self.view = ViewState::Dashboard;
        self.dismiss_notice(NoticeKind::Forecast);
        true
    }

    /// Return to `Searching` keeping the previous record, if `ticket` is still current.
    pub fn fail_loading(&mut self, ticket: Ticket, notice: Notice) -> bool {
        if !self.is_current_load(ticket) {
            return false;
        }
        self.view = ViewState::Searching;
        self.notice = Some(notice);
        true
    }

    /// Back to `Searching`, discarding the record and superseding any run.
    pub fn reset(&mut self) {
        self.load_seq += 1;
        self.record = None;
        self.place = None;
        self.view = ViewState::Searching;
    }
}

/// Handle to the single [`Session`] shared by controller and pipeline.
#[derive(Debug, Clone, Default)]
pub struct SharedSession(Arc<Mutex<Session>>);

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access. Never held across an await.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.0.lock();
        f(&mut *guard)
    }

    /// Consistent copy of the current state for rendering.
    pub fn snapshot(&self) -> Session {
        self.0.lock().clone()
    }
}

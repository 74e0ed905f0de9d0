use crate::view_model::{SearchStatusView, SearchViewModel, UserRowView};
use crate::UserSummary;

/// Marker identifying which dispatched search is the latest one.
pub type Generation = u64;

/// Marker identifying which scheduled (debounced) search may still start.
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<UserSummary>),
    Error(String),
}

/// Everything the coordinator owns: query text, search state, the generation
/// counter and the (orthogonal) panel visibility flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchModel {
    query: String,
    state: SearchState,
    generation: Generation,
    scheduled: Ticket,
    panel_open: bool,
    dirty: bool,
}

impl SearchModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_state(&self) -> &SearchState {
        &self.state
    }

    /// Latest generation handed out; responses tagged with anything else are stale.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Ticket of the latest scheduled search; `SearchDue` with any other ticket is ignored.
    pub fn scheduled_ticket(&self) -> Ticket {
        self.scheduled
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn view(&self) -> SearchViewModel {
        let status = match &self.state {
            SearchState::Idle => SearchStatusView::Idle,
            SearchState::Loading => SearchStatusView::Loading,
            SearchState::Success(users) if users.is_empty() => SearchStatusView::NoMatches,
            SearchState::Success(users) => {
                SearchStatusView::Results(users.iter().map(UserRowView::from).collect())
            }
            SearchState::Error(message) => SearchStatusView::Failed(message.clone()),
        };
        SearchViewModel {
            query: self.query.clone(),
            status,
            panel_open: self.panel_open,
            generation: self.generation,
        }
    }

    /// Returns whether a publish is owed, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_query(&mut self, text: String) {
        self.query = text;
        self.dirty = true;
    }

    /// Invalidates any earlier scheduled search and returns the new ticket.
    pub(crate) fn schedule_search(&mut self) -> Ticket {
        self.scheduled += 1;
        self.scheduled
    }

    /// Allocates the next generation and enters `Loading`.
    pub(crate) fn begin_search(&mut self) -> Generation {
        self.generation += 1;
        self.state = SearchState::Loading;
        self.dirty = true;
        self.generation
    }

    /// Applies a lookup outcome if it belongs to the current generation.
    /// Returns `false` (and leaves the model untouched) for stale outcomes.
    pub(crate) fn finish_search(
        &mut self,
        generation: Generation,
        outcome: Result<Vec<UserSummary>, String>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = match outcome {
            Ok(users) => SearchState::Success(users),
            Err(message) => SearchState::Error(message),
        };
        self.dirty = true;
        true
    }

    /// Resets to `Idle` and invalidates every scheduled search and every
    /// generation handed out so far.
    pub(crate) fn clear(&mut self) {
        self.query.clear();
        self.state = SearchState::Idle;
        self.scheduled += 1;
        self.generation += 1;
        self.dirty = true;
    }

    pub(crate) fn set_panel_open(&mut self, open: bool) {
        if self.panel_open != open {
            self.panel_open = open;
            self.dirty = true;
        }
    }
}

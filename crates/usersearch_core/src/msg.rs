use crate::{Generation, Ticket, UserSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search input (raw, not debounced).
    QueryChanged(String),
    /// Debounce window elapsed for the last query; a search should start now.
    SearchDue { query: String, ticket: Ticket },
    /// Lookup collaborator finished for the given generation.
    LookupFinished {
        generation: Generation,
        outcome: Result<Vec<UserSummary>, String>,
    },
    /// User cleared the search box.
    ClearRequested,
    /// Interaction focus left the widget.
    Dismissed,
    /// Interaction focus returned to the widget.
    Focused,
}

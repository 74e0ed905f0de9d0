use crate::{Generation, Ticket};

/// Side effects requested by [`crate::update`], executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Restart the debounce window; fire `Msg::SearchDue { query, ticket }` once it elapses.
    ScheduleSearch { query: String, ticket: Ticket },
    /// Drop any pending debounced search without tearing the gate down.
    CancelScheduledSearch,
    /// Run the lookup collaborator and report back with the same generation.
    Lookup { generation: Generation, query: String },
}

use usersearch_logging::{search_debug, search_trace};

use crate::{Effect, Msg, SearchModel};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SearchModel, msg: Msg) -> (SearchModel, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => {
            // Every keystroke restarts the debounce window, even for repeats.
            state.set_query(text.clone());
            state.set_panel_open(true);
            let ticket = state.schedule_search();
            vec![Effect::ScheduleSearch {
                query: text,
                ticket,
            }]
        }
        Msg::SearchDue { query, ticket } => {
            // A timer can pass the debounce check just before a newer keystroke
            // or a clear lands; only the latest ticket may start a search.
            if ticket != state.scheduled_ticket() {
                search_debug!(
                    "ignoring superseded search ticket={} current={}",
                    ticket,
                    state.scheduled_ticket()
                );
                return (state, Vec::new());
            }
            let generation = state.begin_search();
            search_trace!("search dispatched generation={} query_len={}", generation, query.len());
            vec![Effect::Lookup { generation, query }]
        }
        Msg::LookupFinished {
            generation,
            outcome,
        } => {
            let current = state.generation();
            if !state.finish_search(generation, outcome) {
                search_debug!(
                    "dropping stale lookup result generation={} current={}",
                    generation,
                    current
                );
            }
            Vec::new()
        }
        Msg::ClearRequested => {
            state.clear();
            vec![Effect::CancelScheduledSearch]
        }
        Msg::Dismissed => {
            state.set_panel_open(false);
            Vec::new()
        }
        Msg::Focused => {
            state.set_panel_open(true);
            Vec::new()
        }
    };

    (state, effects)
}

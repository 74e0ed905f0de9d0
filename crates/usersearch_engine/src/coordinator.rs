use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use usersearch_core::{update, Effect, Generation, Msg, SearchModel, SearchViewModel, Ticket};
use usersearch_logging::{advance_publish_tick, search_debug, search_info, search_warn};

use crate::{Debouncer, RenderSink, UserLookup};

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Debounce quiet period between the last keystroke and the search.
    pub quiet_period: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(300),
        }
    }
}

/// Owns the search state machine and executes its effects.
///
/// Every message is reduced, published and has its effects started while the
/// model lock is held, so generation checks and publish order are atomic with
/// respect to concurrent callers and lookup completions.
pub struct SearchCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    model: Mutex<SearchModel>,
    lookup: Arc<dyn UserLookup>,
    sink: Arc<dyn RenderSink>,
    debouncer: Debouncer<(String, Ticket)>,
    runtime: Handle,
    shutdown: CancellationToken,
}

impl SearchCoordinator {
    pub fn new(
        runtime: Handle,
        lookup: Arc<dyn UserLookup>,
        sink: Arc<dyn RenderSink>,
        settings: CoordinatorSettings,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let debouncer = Debouncer::new(
                runtime.clone(),
                settings.quiet_period,
                move |(query, ticket): (String, Ticket)| {
                    if let Some(inner) = weak.upgrade() {
                        inner.dispatch(Msg::SearchDue { query, ticket });
                    }
                },
            );
            Inner {
                model: Mutex::new(SearchModel::new()),
                lookup,
                sink,
                debouncer,
                runtime,
                shutdown: CancellationToken::new(),
            }
        });
        search_info!(
            "search coordinator ready quiet_period_ms={}",
            settings.quiet_period.as_millis()
        );
        Self { inner }
    }

    /// Records the raw input text and restarts the debounce window.
    pub fn update_query(&self, text: impl Into<String>) {
        self.inner.dispatch(Msg::QueryChanged(text.into()));
    }

    /// Empties the query and returns to `Idle`; in-flight results are discarded.
    pub fn clear(&self) {
        self.inner.dispatch(Msg::ClearRequested);
    }

    /// Closes the result panel. Search state is left alone.
    pub fn dismiss(&self) {
        self.inner.dispatch(Msg::Dismissed);
    }

    pub fn focus(&self) {
        self.inner.dispatch(Msg::Focused);
    }

    pub fn view(&self) -> SearchViewModel {
        self.inner.lock_model().view()
    }

    pub fn generation(&self) -> Generation {
        self.inner.lock_model().generation()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Stops the debounce gate and abandons outstanding lookups.
    /// Later calls on this coordinator are ignored.
    pub fn shutdown(&self) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        search_info!("search coordinator shutting down");
        self.inner.debouncer.teardown();
        self.inner.shutdown.cancel();
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn lock_model(&self) -> MutexGuard<'_, SearchModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(self: &Arc<Self>, msg: Msg) {
        if self.shutdown.is_cancelled() {
            search_debug!("ignoring {:?} after shutdown", msg);
            return;
        }

        let mut guard = self.lock_model();
        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            let tick = advance_publish_tick();
            search_debug!(
                "publish tick={} generation={} status={:?}",
                tick,
                view.generation,
                view.status
            );
            self.sink.publish(&view);
        }
        *guard = state;

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(self: &Arc<Self>, effect: Effect) {
        match effect {
            Effect::ScheduleSearch { query, ticket } => self.debouncer.trigger((query, ticket)),
            Effect::CancelScheduledSearch => self.debouncer.cancel(),
            Effect::Lookup { generation, query } => self.spawn_lookup(generation, query),
        }
    }

    fn spawn_lookup(self: &Arc<Self>, generation: Generation, query: String) {
        let weak = Arc::downgrade(self);
        let lookup = Arc::clone(&self.lookup);
        let shutdown = self.shutdown.clone();
        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                _ = shutdown.cancelled() => return,
                outcome = lookup.lookup(&query) => outcome,
            };
            let outcome = outcome.map_err(|err| {
                if err.is_malformed() {
                    search_warn!("lookup generation={} got a malformed payload: {}", generation, err);
                } else {
                    search_debug!("lookup generation={} failed: {}", generation, err);
                }
                err.user_message()
            });
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(Msg::LookupFinished {
                    generation,
                    outcome,
                });
            }
        });
    }
}

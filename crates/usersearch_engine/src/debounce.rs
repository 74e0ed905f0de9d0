use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use usersearch_logging::search_trace;

type Target<T> = Arc<dyn Fn(T) + Send + Sync>;

#[derive(Default)]
struct Slot {
    /// Incremented by every trigger; a timer only fires if it still owns the latest value.
    seq: u64,
    pending: Option<CancellationToken>,
    torn_down: bool,
}

/// Delays `target` until `quiet` has elapsed since the last [`Debouncer::trigger`].
///
/// Only the arguments of the last trigger are delivered. After
/// [`Debouncer::teardown`] (or drop) nothing fires, even if a timer was pending.
pub struct Debouncer<T> {
    runtime: Handle,
    quiet: Duration,
    target: Target<T>,
    root: CancellationToken,
    slot: Arc<Mutex<Slot>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(runtime: Handle, quiet: Duration, target: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            runtime,
            quiet,
            target: Arc::new(target),
            root: CancellationToken::new(),
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Cancels any pending invocation and schedules a new one `quiet` from now.
    pub fn trigger(&self, args: T) {
        let token = self.root.child_token();
        let seq = {
            let mut slot = lock(&self.slot);
            if slot.torn_down {
                return;
            }
            slot.seq += 1;
            if let Some(previous) = slot.pending.replace(token.clone()) {
                previous.cancel();
            }
            slot.seq
        };

        let quiet = self.quiet;
        let target = Arc::clone(&self.target);
        let slot = Arc::clone(&self.slot);
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    search_trace!("debounce timer seq={} superseded", seq);
                }
                _ = tokio::time::sleep(quiet) => {
                    let fire = {
                        let mut slot = lock(&slot);
                        let owns_slot = !slot.torn_down && slot.seq == seq;
                        if owns_slot {
                            slot.pending = None;
                        }
                        owns_slot
                    };
                    if fire {
                        target(args);
                    }
                }
            }
        });
    }

    /// Drops the pending invocation, if any. The gate stays usable.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        slot.seq += 1;
        if let Some(previous) = slot.pending.take() {
            previous.cancel();
        }
    }

    /// Permanently disables the gate; pending and future triggers never fire.
    pub fn teardown(&self) {
        {
            let mut slot = lock(&self.slot);
            slot.torn_down = true;
            slot.pending = None;
        }
        self.root.cancel();
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).pending.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        lock(&self.slot).torn_down = true;
        self.root.cancel();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recording_gate(quiet_ms: u64) -> (Debouncer<String>, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let gate = Debouncer::new(
            Handle::current(),
            Duration::from_millis(quiet_ms),
            move |query: String| sink.lock().unwrap().push(query),
        );
        (gate, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_last_args() {
        let (gate, calls) = recording_gate(300);

        gate.trigger("a".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        gate.trigger("ab".to_string());
        tokio::time::sleep(Duration::from_millis(299)).await;
        gate.trigger("abc".to_string());
        assert!(gate.is_pending());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["abc".to_string()]);
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_quiet_periods_fire_separately() {
        let (gate, calls) = recording_gate(50);

        gate.trigger("a".to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;
        gate.trigger("a".to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["a".to_string(), "a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_prevents_pending_invocation() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let gate = Debouncer::new(Handle::current(), Duration::from_millis(200), move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        gate.trigger(());
        tokio::time::sleep(Duration::from_millis(100)).await;
        gate.teardown();
        gate.trigger(());
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_prevents_pending_invocation() {
        let (gate, calls) = recording_gate(200);
        gate.trigger("a".to_string());
        drop(gate);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_but_keeps_gate_usable() {
        let (gate, calls) = recording_gate(100);

        gate.trigger("a".to_string());
        gate.cancel();
        assert!(!gate.is_pending());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().unwrap().is_empty());

        gate.trigger("b".to_string());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["b".to_string()]);
    }
}

use std::sync::mpsc;

use usersearch_core::SearchViewModel;

/// Receives every published view, in transition order.
///
/// Called while the coordinator holds its state lock, so implementations must
/// hand the view off quickly and never call back into the coordinator.
pub trait RenderSink: Send + Sync {
    fn publish(&self, view: &SearchViewModel);
}

pub struct ChannelRenderSink {
    tx: mpsc::Sender<SearchViewModel>,
}

impl ChannelRenderSink {
    pub fn new(tx: mpsc::Sender<SearchViewModel>) -> Self {
        Self { tx }
    }
}

impl RenderSink for ChannelRenderSink {
    fn publish(&self, view: &SearchViewModel) {
        let _ = self.tx.send(view.clone());
    }
}

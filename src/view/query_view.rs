//! A mounted query

use crate::error::NsAdminResult;
use crate::query::{
    FetchMode, FetchOutcome, FetchTicket, QueryCache, QueryEntry, QueryKey, Subscription,
};
use crate::view::projector::{project, ViewState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// One key kept on screen.
///
/// Every transition of the key arrives through [`next_state`](Self::next_state),
/// in order. Dropping the view unsubscribes; a fetch already in flight still
/// lands in the cache.
pub struct QueryView {
    cache: QueryCache,
    key: QueryKey,
    updates: mpsc::UnboundedReceiver<ViewState>,
    _subscription: Subscription,
}

impl QueryView {
    /// Subscribe to `key` and make sure it gets fetched.
    ///
    /// The `Pending` transition happens before this returns, so a second
    /// mount of the same key joins the first fetch instead of starting
    /// another. Must be called from within a tokio runtime.
    pub fn mount(cache: &QueryCache, key: QueryKey) -> NsAdminResult<Self> {
        let (tx, updates) = mpsc::unbounded_channel();
        let subscription = cache.subscribe(&key, move |entry| {
            // Receiver gone means the view is being dropped
            let _ = tx.send(project(entry));
        });

        match cache.start_fetch(&key, FetchMode::Ensure)? {
            FetchTicket::Started(fetch) => {
                debug!("Mounted {}, fetch {}", key, fetch.request_id());
                tokio::spawn(fetch.resolve());
            }
            FetchTicket::Skipped(outcome) => {
                debug!("Mounted {} ({:?})", key, outcome);
            }
        }

        Ok(Self {
            cache: cache.clone(),
            key,
            updates,
            _subscription: subscription,
        })
    }

    /// Projection of the current cache entry
    pub fn state(&self) -> ViewState {
        project(&self.entry())
    }

    /// The raw cache entry behind [`state`](Self::state)
    pub fn entry(&self) -> QueryEntry {
        self.cache.snapshot(&self.key)
    }

    /// Next transition, in delivery order
    pub async fn next_state(&mut self) -> Option<ViewState> {
        self.updates.recv().await
    }

    /// Wait until the current fetch, if any, has finished.
    ///
    /// Transitions already queued are discarded.
    pub async fn settled(&mut self) -> ViewState {
        loop {
            while self.updates.try_recv().is_ok() {}

            let state = self.state();
            if state.is_settled() || state == ViewState::Idle {
                return state;
            }
            if self.next_state().await.is_none() {
                return self.state();
            }
        }
    }

    /// Refetch the key now, superseding anything in flight.
    ///
    /// Observers see `Loading` before this returns. Each call issues its
    /// own request; rapid calls are not coalesced.
    pub fn trigger_refresh(&self) -> NsAdminResult<JoinHandle<FetchOutcome>> {
        let ticket = self.cache.start_fetch(&self.key, FetchMode::Force)?;
        debug!("Refresh {:?} requested for {}", ticket.request_id(), self.key);
        Ok(tokio::spawn(ticket.resolve()))
    }
}

//! Query cache with single-flight fetching and stale-response discard

use crate::api::FetchError;
use crate::error::{NsAdminError, NsAdminResult};
use crate::query::entry::{QueryEntry, QueryStatus, RequestId};
use crate::query::key::QueryKey;
use crate::query::QueryFn;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

type Observer = Arc<dyn Fn(&QueryEntry) + Send + Sync>;

/// How a fetch request treats the current entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Fetch only if the entry is idle or failed
    Ensure,
    /// Always fetch, superseding any in-flight request
    Force,
}

/// What became of a fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was written to the entry
    Applied,
    /// A newer fetch started meanwhile; the result was dropped
    Superseded,
    /// Another fetch for the key was already running
    AlreadyPending,
    /// The entry already holds data
    Fresh,
}

#[derive(Default)]
struct Slot {
    entry: QueryEntry,
    fetcher: Option<Arc<dyn QueryFn>>,
    observers: Vec<(u64, Observer)>,
}

#[derive(Default)]
struct State {
    slots: HashMap<QueryKey, Slot>,
    next_observer_id: u64,
    /// Changes waiting to be delivered, in order
    queue: VecDeque<(QueryKey, QueryEntry)>,
    /// Set while some caller is draining `queue`
    dispatching: bool,
}

/// Shared handle to the query cache.
///
/// Clones refer to the same cache. The lock is held only for single state
/// transitions; never across a fetch and never while observers run.
#[derive(Clone, Default)]
pub struct QueryCache {
    state: Arc<Mutex<State>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the fetch function for `key`
    pub fn register(&self, key: QueryKey, fetcher: Arc<dyn QueryFn>) {
        debug!("Registered query {}", key);
        self.lock().slots.entry(key).or_default().fetcher = Some(fetcher);
    }

    /// Current entry for `key`, or the idle default. Never fetches.
    pub fn snapshot(&self, key: &QueryKey) -> QueryEntry {
        self.lock()
            .slots
            .get(key)
            .map(|slot| slot.entry.clone())
            .unwrap_or_default()
    }

    /// Call `observer` with the new entry after every change to `key`.
    ///
    /// Observers may call back into the cache. Changes they cause are
    /// queued and delivered after the current round completes.
    pub fn subscribe<F>(&self, key: &QueryKey, observer: F) -> Subscription
    where
        F: Fn(&QueryEntry) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = state.next_observer_id;
        state.next_observer_id += 1;
        state
            .slots
            .entry(key.clone())
            .or_default()
            .observers
            .push((id, Arc::new(observer)));

        Subscription {
            state: Arc::downgrade(&self.state),
            key: key.clone(),
            id,
        }
    }

    /// Fetch `key` unless it is already pending or holds data
    pub async fn ensure_fetch(&self, key: &QueryKey) -> NsAdminResult<FetchOutcome> {
        Ok(self.start_fetch(key, FetchMode::Ensure)?.resolve().await)
    }

    /// Fetch `key` unconditionally, superseding any in-flight request
    pub async fn force_fetch(&self, key: &QueryKey) -> NsAdminResult<FetchOutcome> {
        Ok(self.start_fetch(key, FetchMode::Force)?.resolve().await)
    }

    /// Perform the `Pending` transition now and hand back the pending work.
    ///
    /// Observers have already seen `Pending` when this returns.
    pub fn start_fetch(&self, key: &QueryKey, mode: FetchMode) -> NsAdminResult<FetchTicket> {
        let (request_id, fetcher) = {
            let mut guard = self.lock();
            let state = &mut *guard;

            let Some(slot) = state.slots.get_mut(key) else {
                return Err(NsAdminError::QueryNotRegistered(key.to_string()));
            };
            let Some(fetcher) = slot.fetcher.clone() else {
                return Err(NsAdminError::QueryNotRegistered(key.to_string()));
            };

            if mode == FetchMode::Ensure && !slot.entry.needs_fetch() {
                let outcome = if slot.entry.status() == QueryStatus::Pending {
                    FetchOutcome::AlreadyPending
                } else {
                    FetchOutcome::Fresh
                };
                debug!("Skipping fetch for {}: {:?}", key, outcome);
                return Ok(FetchTicket::Skipped(outcome));
            }

            let request_id = RequestId::new();
            if let Some(previous) = slot.entry.in_flight() {
                debug!("Fetch {} for {} supersedes {}", request_id, key, previous);
            }
            slot.entry = slot.entry.begin(request_id);
            state.queue.push_back((key.clone(), slot.entry.clone()));
            (request_id, fetcher)
        };

        debug!("Started fetch {} for {} ({:?})", request_id, key, mode);
        self.dispatch();

        Ok(FetchTicket::Started(InFlightFetch {
            cache: self.clone(),
            key: key.clone(),
            request_id,
            fetcher,
        }))
    }

    /// Apply a result if `request_id` is still the key's latest request
    fn complete(
        &self,
        key: &QueryKey,
        request_id: RequestId,
        result: Result<Vec<String>, FetchError>,
    ) -> FetchOutcome {
        {
            let mut guard = self.lock();
            let state = &mut *guard;

            let Some(slot) = state.slots.get_mut(key) else {
                return FetchOutcome::Superseded;
            };
            if slot.entry.in_flight() != Some(request_id) {
                debug!("Discarding stale response {} for {}", request_id, key);
                return FetchOutcome::Superseded;
            }

            slot.entry = QueryEntry::resolve(result, Utc::now());
            debug!(
                "Fetch {} for {} finished: {:?}",
                request_id,
                key,
                slot.entry.status()
            );
            state.queue.push_back((key.clone(), slot.entry.clone()));
        }

        self.dispatch();
        FetchOutcome::Applied
    }

    /// Drain the notification queue unless another caller already is.
    ///
    /// One change is delivered to all of its observers before the next
    /// change is taken off the queue.
    fn dispatch(&self) {
        {
            let mut state = self.lock();
            if state.dispatching {
                return;
            }
            state.dispatching = true;
        }
        let _reset = DispatchReset(self);

        loop {
            let (entry, observers) = {
                let mut guard = self.lock();
                let state = &mut *guard;
                let Some((key, entry)) = state.queue.pop_front() else {
                    state.dispatching = false;
                    return;
                };
                let observers: Vec<Observer> = state
                    .slots
                    .get(&key)
                    .map(|slot| slot.observers.iter().map(|(_, o)| Arc::clone(o)).collect())
                    .unwrap_or_default();
                (entry, observers)
            };

            for observer in &observers {
                observer(&entry);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears `dispatching` when an observer panics mid-round, so later
/// changes are still delivered. Changes still queued go out with the next
/// round.
struct DispatchReset<'a>(&'a QueryCache);

impl Drop for DispatchReset<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.lock().dispatching = false;
        }
    }
}

/// Result of [`QueryCache::start_fetch`]
pub enum FetchTicket {
    Started(InFlightFetch),
    Skipped(FetchOutcome),
}

impl FetchTicket {
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Started(fetch) => Some(fetch.request_id()),
            Self::Skipped(_) => None,
        }
    }

    /// Run the fetch, if one was started, and report the outcome
    pub async fn resolve(self) -> FetchOutcome {
        match self {
            Self::Started(fetch) => fetch.resolve().await,
            Self::Skipped(outcome) => outcome,
        }
    }
}

/// A fetch whose `Pending` transition has happened but whose result has
/// not been applied yet. Dropping it abandons the fetch; the entry stays
/// `Pending` until a forced fetch replaces it.
pub struct InFlightFetch {
    cache: QueryCache,
    key: QueryKey,
    request_id: RequestId,
    fetcher: Arc<dyn QueryFn>,
}

impl InFlightFetch {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Await the fetcher and apply its result
    pub async fn resolve(self) -> FetchOutcome {
        let result = self.fetcher.fetch().await;
        if let Err(ref e) = result {
            debug!("Fetch {} for {} failed ({}): {}", self.request_id, self.key, e.kind(), e);
        }
        self.cache.complete(&self.key, self.request_id, result)
    }
}

/// Observer registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    state: Weak<Mutex<State>>,
    key: QueryKey,
    id: u64,
}

impl Subscription {
    /// Stop receiving notifications
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };

        // Released outside the lock: the observer may own things whose
        // drop touches the cache.
        let removed = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.slots.get_mut(&self.key).and_then(|slot| {
                let pos = slot.observers.iter().position(|(id, _)| *id == self.id)?;
                Some(slot.observers.remove(pos))
            })
        };
        drop(removed);
    }
}

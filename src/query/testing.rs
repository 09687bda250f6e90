//! Query functions for tests

use crate::api::FetchError;
use crate::query::QueryFn;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Reply = Result<Vec<String>, FetchError>;

/// Answers every fetch immediately with the same result
pub struct Static {
    reply: Reply,
    calls: AtomicUsize,
}

impl Static {
    pub fn ok(items: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(items.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn err(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryFn for Static {
    async fn fetch(&self) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// Each fetch waits for the reply the test sends through the matching
/// [`expect`](Scripted::expect) handle, in call order.
pub struct Scripted {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    calls: AtomicUsize,
}

impl Scripted {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Queue a reply slot for the next fetch
    pub fn expect(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryFn for Scripted {
    async fn fetch(&self) -> Reply {
        let rx = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("fetch without an expected reply");
        self.calls.fetch_add(1, Ordering::SeqCst);
        rx.await
            .unwrap_or_else(|_| Err(FetchError::transport("reply dropped")))
    }
}

/// Yield until `script` has been called `n` times
pub async fn wait_for_calls(script: &Scripted, n: usize) {
    while script.calls() < n {
        tokio::task::yield_now().await;
    }
}

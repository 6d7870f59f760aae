//! RecordingSink - 開発・テスト用の Sink
//!
//! add された event をすべて記録し、close の回数を数えます。
//! `failing_close` で close を失敗させることもできます。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::SinkError;
use crate::ports::Sink;

pub struct RecordingSink<E> {
    events: Mutex<Vec<E>>,
    closes: AtomicUsize,
    close_error: Option<String>,
    added: Notify,
}

impl<E> RecordingSink<E> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            close_error: None,
            added: Notify::new(),
        }
    }

    /// A sink whose `close` always fails with `message`.
    pub fn failing_close(message: impl Into<String>) -> Self {
        Self {
            close_error: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.lock_events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }

    /// Wait until at least `n` events have been recorded.
    pub async fn wait_for(&self, n: usize) {
        loop {
            let notified = self.added.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.len() >= n {
                return;
            }
            notified.await;
        }
    }

    fn lock_events(&self) -> MutexGuard<'_, Vec<E>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Clone> RecordingSink<E> {
    /// Snapshot of every event added so far, in arrival order.
    pub fn events(&self) -> Vec<E> {
        self.lock_events().clone()
    }
}

impl<E> Default for RecordingSink<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Send> Sink<E> for RecordingSink<E> {
    fn add(&self, event: E) {
        self.lock_events().push(event);
        self.added.notify_waiters();
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        match &self.close_error {
            Some(message) => Err(SinkError(message.clone())),
            None => Ok(()),
        }
    }
}

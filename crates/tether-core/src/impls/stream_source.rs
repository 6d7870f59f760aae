//! StreamSource - futures::Stream を Source として使うためのアダプタ
//!
//! # 仕組み
//! - listen 時に tokio task を spawn して stream を駆動
//! - cancel は watch channel で通知し、task の終了を join で待つ
//! - callback が panic した場合は cancel が `CancelError::ListenerPanicked` を返す
//!
//! tokio runtime の中で listen する必要があります（`tokio::spawn` を使うため）。

use std::any::Any;
use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{Map, Stream, StreamExt};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::error::CancelError;
use crate::ports::{Listener, Source, Subscription, SubscriptionHandle};

type OkFn<T> = fn(T) -> Result<T, Infallible>;

/// StreamSource は `Stream<Item = Result<T, Err>>` を Source にする
///
/// Errors are delivered to the listener and the stream keeps being polled; the
/// subscription ends when the stream returns `None`.
pub struct StreamSource<St> {
    stream: St,
    name: &'static str,
}

impl<St> StreamSource<St> {
    pub fn new(stream: St) -> Self {
        Self {
            stream,
            name: std::any::type_name::<St>(),
        }
    }

    /// Override the name reported in logs and `ErrorContext`.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<S: Stream> StreamSource<Map<S, OkFn<S::Item>>> {
    /// Wrap a stream of plain values; it can never deliver an error.
    pub fn infallible(stream: S) -> Self {
        Self {
            stream: stream.map(Ok as OkFn<S::Item>),
            name: std::any::type_name::<S>(),
        }
    }
}

impl<St, T, Err> Source for StreamSource<St>
where
    St: Stream<Item = Result<T, Err>> + Send + 'static,
    T: Send + 'static,
    Err: Send + 'static,
{
    type Item = T;
    type Error = Err;

    fn listen(self, mut listener: Listener<T, Err>) -> SubscriptionHandle {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let name = self.name;
        let stream = self.stream;

        let join = tokio::spawn(async move {
            let mut stream = std::pin::pin!(stream);
            loop {
                // cancel が来ていたら次の値を配送しない
                if *cancel_rx.borrow() {
                    break;
                }

                let next = tokio::select! {
                    biased;
                    changed = cancel_rx.changed() => match changed {
                        Ok(()) => continue,
                        // 全ハンドルが drop された = cancel と同じ扱い
                        Err(_) => break,
                    },
                    next = stream.next() => next,
                };

                match next {
                    Some(Ok(value)) => listener.data(value),
                    Some(Err(err)) => listener.error(err),
                    None => {
                        listener.done();
                        break;
                    }
                }
            }
            tracing::trace!(source = name, delivered = listener.delivered(), "listener stopped");
        });

        Arc::new(TaskSubscription::new(cancel_tx, join))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// TaskSubscription は spawn された listener task のハンドル
pub struct TaskSubscription {
    cancel_tx: watch::Sender<bool>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSubscription {
    fn new(cancel_tx: watch::Sender<bool>, join: JoinHandle<()>) -> Self {
        Self {
            cancel_tx,
            join: Mutex::new(Some(join)),
        }
    }
}

#[async_trait]
impl Subscription for TaskSubscription {
    async fn cancel(&self) -> Result<(), CancelError> {
        self.cancel_tx.send_replace(true);

        // 2 回目以降の呼び出しはロックで最初の join の完了を待ち、None を見て戻る。
        // handle は join が終わるまで slot に残す（途中で drop された cancel の後でも待てる）
        let mut join = self.join.lock().await;
        let Some(handle) = join.as_mut() else {
            return Ok(());
        };
        let joined = handle.await;
        *join = None;

        match joined {
            Ok(()) => Ok(()),
            Err(e) if e.is_panic() => Err(CancelError::ListenerPanicked(panic_message(
                e.into_panic(),
            ))),
            Err(_) => Err(CancelError::ListenerAborted),
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

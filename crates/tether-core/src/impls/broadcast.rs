//! BroadcastStreamable - tokio broadcast channel を Streamable として公開
//!
//! `source()` を呼ぶたびに新しい receiver を作ります。
//! 受信側が追いつけなかった場合は `BroadcastError::Lagged` が error 経路で届きます。

use futures::stream::{Map, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::error::BroadcastError;
use crate::impls::StreamSource;
use crate::ports::Streamable;

type LiftFn<T> = fn(Result<T, BroadcastStreamRecvError>) -> Result<T, BroadcastError>;

/// Source type produced by [`BroadcastStreamable::source`].
pub type BroadcastSource<T> = StreamSource<Map<BroadcastStream<T>, LiftFn<T>>>;

pub struct BroadcastStreamable<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> BroadcastStreamable<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to every current receiver. Returns how many receivers got it.
    pub fn send(&self, value: T) -> usize {
        self.tx.send(value).unwrap_or(0)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Send + 'static> Streamable for BroadcastStreamable<T> {
    type Source = BroadcastSource<T>;

    fn source(&self) -> Self::Source {
        let stream = BroadcastStream::new(self.tx.subscribe()).map(lift as LiftFn<T>);
        StreamSource::new(stream).named("broadcast")
    }
}

fn lift<T>(item: Result<T, BroadcastStreamRecvError>) -> Result<T, BroadcastError> {
    item.map_err(|BroadcastStreamRecvError::Lagged(n)| BroadcastError::Lagged(n))
}

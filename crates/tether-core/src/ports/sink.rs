//! Sink port - イベントを受け取り、close で終了する相手
//!
//! 状態管理フレームワーク側の sink（bloc など）をこの trait で抽象化します。
//! 実装は外部のものを想定し、このクレートには開発用の `RecordingSink` のみ含みます。

use async_trait::async_trait;

use crate::error::SinkError;

/// Sink accepts events of type `E` and can be finalized with `close`.
///
/// # Contract
/// - `add` is synchronous; it may be called from inside a source's delivery callback.
/// - Adding after close is invalid per the sink's own rules. Wrappers do not change that.
#[async_trait]
pub trait Sink<E>: Send + Sync {
    fn add(&self, event: E);

    async fn close(&self) -> Result<(), SinkError>;
}

//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **StreamSource**: futures::Stream → Source（tokio task で駆動）
//! - **BroadcastStreamable**: tokio broadcast channel → Streamable
//! - **RecordingSink**: event を記録するだけの Sink
//!
//! 本番の sink（状態管理フレームワーク側のオブジェクト）は利用側で `Sink` を実装します。

pub mod broadcast;
pub mod recording_sink;
pub mod stream_source;

// 主要な型を再エクスポート
pub use self::broadcast::{BroadcastSource, BroadcastStreamable};
pub use self::recording_sink::RecordingSink;
pub use self::stream_source::{StreamSource, TaskSubscription};

//! Ports - 抽象化レイヤー
//!
//! 外部の状態管理フレームワークや stream ライブラリとの境界を trait で定義します。
//! このクレートはこれらを再実装せず、ライフサイクルの結び付けだけを担当します。
//!
//! # 境界
//! - **Sink**: add(event) と close()
//! - **Source**: listen(listener) → SubscriptionHandle
//! - **Streamable**: 内部の Source を取り出す
//! - **Subscription**: cancel()

pub mod sink;
pub mod source;
pub mod subscription;

// 主要な trait を再エクスポート
pub use self::sink::Sink;
pub use self::source::{ListenOptions, Listener, Source, Streamable};
pub use self::subscription::{Subscription, SubscriptionHandle};

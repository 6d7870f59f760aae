//! tether-core
//!
//! Ties stream subscriptions to the lifecycle of an event sink: everything attached
//! through a [`LifecycleSink`] is cancelled when that sink closes.
//!
//! # モジュール構成
//! - **domain**: ID, CloseConfig, ErrorContext
//! - **ports**: 抽象化レイヤー（Sink, Source, Streamable, Subscription）
//! - **app**: LifecycleSink と ReactOptions
//! - **impls**: 開発・テスト用の実装（StreamSource, BroadcastStreamable, RecordingSink）
//! - **error**: エラー型

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{LifecycleSink, ReactOptions};
pub use domain::{CancelOrder, CloseConfig, ErrorContext, FailurePolicy, SinkId, SubscriptionId};
pub use error::{BroadcastError, CancelError, CancelFailure, CloseError, SinkError};
pub use ports::{ListenOptions, Sink, Source, Streamable, Subscription, SubscriptionHandle};

//! Identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID
//! sink と subscription にはそれぞれ ULID を割り当てます。
//! ログの `sink` / `subscription` フィールドと `CloseError` で使います。
//!
//! ## Phantom Type パターン
//! `Id<T>` で共通実装を持ち、`T` はマーカー型としてコンパイル時にのみ使います。
//! SinkId と SubscriptionId は混同できません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"sink-", "sub-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// 新しい ID を生成（現在時刻ベース）
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Sink のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sink {}

impl IdMarker for Sink {
    fn prefix() -> &'static str {
        "sink-"
    }
}

/// Subscription のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subscription {}

impl IdMarker for Subscription {
    fn prefix() -> &'static str {
        "sub-"
    }
}

/// Identifier of a lifecycle-managed sink.
pub type SinkId = Id<Sink>;

/// Identifier of one tracked subscription.
pub type SubscriptionId = Id<Subscription>;

//! Subscription port - source と listener の購読関係

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CancelError;

/// Subscription は cancel 可能な購読ハンドル
///
/// # Idempotency
/// `cancel` may be called more than once and from several owners at the same time.
/// Later calls wait for the same cleanup and then return `Ok(())`.
#[async_trait]
pub trait Subscription: Send + Sync {
    /// Stop further delivery and release the listener's resources.
    /// Resolves once cleanup has finished.
    async fn cancel(&self) -> Result<(), CancelError>;

    /// Whether `cancel` has been requested.
    fn is_cancelled(&self) -> bool;
}

/// Shared handle: owned jointly by the caller and the lifecycle adapter.
pub type SubscriptionHandle = Arc<dyn Subscription>;

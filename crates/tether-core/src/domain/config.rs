//! Close configuration: how tracked subscriptions are cancelled on close.

use serde::{Deserialize, Serialize};

/// Order in which tracked subscriptions are cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOrder {
    /// First attached, first cancelled. Each cancellation is awaited before the next starts.
    #[default]
    Sequential,

    /// All cancellations are started together and awaited as a group.
    /// Failures are still reported in registration order.
    Concurrent,
}

/// What close does when a cancellation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep cancelling the rest, finalize the sink, then report every failure.
    #[default]
    Continue,

    /// Stop at the first failure. The sink is not finalized.
    ///
    /// With `CancelOrder::Concurrent` every cancellation has already run, so all
    /// failures are returned in `CloseError::Aborted`.
    Abort,
}

/// CloseConfig は close 時の挙動を決める
///
/// # Default
/// - order: Sequential
/// - on_failure: Continue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseConfig {
    pub order: CancelOrder,
    pub on_failure: FailurePolicy,
}

impl CloseConfig {
    pub fn new(order: CancelOrder, on_failure: FailurePolicy) -> Self {
        Self { order, on_failure }
    }

    /// Literal fail-fast semantics: sequential, stop at the first broken cancellation.
    pub fn fail_fast() -> Self {
        Self::new(CancelOrder::Sequential, FailurePolicy::Abort)
    }

    pub fn with_order(mut self, order: CancelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_failure_policy(mut self, on_failure: FailurePolicy) -> Self {
        self.on_failure = on_failure;
        self
    }
}

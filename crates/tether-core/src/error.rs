use thiserror::Error;

use crate::domain::SubscriptionId;

/// Failure while releasing a subscription.
#[derive(Debug, Error)]
pub enum CancelError {
    #[error("listener panicked: {0}")]
    ListenerPanicked(String),

    #[error("listener task was aborted before it finished")]
    ListenerAborted,

    #[error("{0}")]
    Failed(String),
}

/// Failure reported by the wrapped sink's own close.
#[derive(Debug, Error)]
#[error("sink close failed: {0}")]
pub struct SinkError(pub String);

/// One subscription that could not be cancelled.
#[derive(Debug, Error)]
#[error("cancelling {id} ({source_name}) failed: {source}")]
pub struct CancelFailure {
    pub id: SubscriptionId,
    pub source_name: &'static str,
    #[source]
    pub source: CancelError,
}

/// Error delivered by `BroadcastStreamable` sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("receiver lagged behind by {0} value(s)")]
    Lagged(u64),
}

#[derive(Debug, Error)]
pub enum CloseError {
    /// Every cancellation was attempted, some failed; the sink itself was finalized.
    #[error("{} subscription(s) failed to cancel", .failures.len())]
    Cancellation { failures: Vec<CancelFailure> },

    /// Close stopped after a failure; the sink was not finalized.
    ///
    /// Sequential order stops at the first failure, so `failures` holds exactly one
    /// entry. Concurrent order has already attempted every cancellation and keeps
    /// all of them, in registration order.
    #[error("close aborted: {} subscription(s) failed to cancel", .failures.len())]
    Aborted { failures: Vec<CancelFailure> },

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("{} subscription(s) failed to cancel and {sink}", .failures.len())]
    Both {
        failures: Vec<CancelFailure>,
        sink: SinkError,
    },
}

impl CloseError {
    /// Cancellation failures carried by this error, in registration order.
    pub fn cancel_failures(&self) -> &[CancelFailure] {
        match self {
            CloseError::Cancellation { failures }
            | CloseError::Aborted { failures }
            | CloseError::Both { failures, .. } => failures,
            CloseError::Sink(_) => &[],
        }
    }
}

//! Domain model (IDs, close configuration, diagnostic context).

pub mod config;
pub mod context;
pub mod ids;

pub use self::config::{CancelOrder, CloseConfig, FailurePolicy};
pub use self::context::ErrorContext;
pub use self::ids::{SinkId, SubscriptionId};

//! ErrorContext - エラー通知に添える診断情報

use std::fmt;

/// Diagnostic context handed to error callbacks and error-to-event mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorContext {
    /// Name of the source that produced the error (see `Source::name`).
    pub source: &'static str,

    /// Zero-based position of the error among everything the source delivered so far
    /// (values and errors both count).
    pub index: u64,
}

impl ErrorContext {
    pub fn new(source: &'static str, index: u64) -> Self {
        Self { source, index }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source, self.index)
    }
}

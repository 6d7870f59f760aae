//! ReactOptions - source の error / done を sink の event に変換する設定

use crate::domain::ErrorContext;

pub type ErrorMapping<Err, E> = Box<dyn FnMut(Err, ErrorContext) -> Option<E> + Send>;
pub type DoneMapping<E> = Box<dyn FnOnce() -> Option<E> + Send>;

/// Optional mappings used by `LifecycleSink::react`.
///
/// - `on_error` present → the mapped event is added if it is `Some`; absent → no event.
/// - `on_done` present → the mapped event is added if it is `Some`; absent → no event.
pub struct ReactOptions<Err, E> {
    pub on_error: Option<ErrorMapping<Err, E>>,
    pub on_done: Option<DoneMapping<E>>,
}

impl<Err, E> ReactOptions<Err, E> {
    pub fn new() -> Self {
        Self {
            on_error: None,
            on_done: None,
        }
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(Err, ErrorContext) -> Option<E> + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_done<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Option<E> + Send + 'static,
    {
        self.on_done = Some(Box::new(f));
        self
    }
}

impl<Err, E> Default for ReactOptions<Err, E> {
    fn default() -> Self {
        Self::new()
    }
}

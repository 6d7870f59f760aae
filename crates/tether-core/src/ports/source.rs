//! Source / Streamable ports - 非同期 source の抽象化
//!
//! # 構成
//! - **Source**: listen して SubscriptionHandle を返す
//! - **Streamable**: 内部に Source を持つオブジェクト（一段の間接参照）
//! - **Listener**: data / error / done の各 callback をまとめたもの
//! - **ListenOptions**: error / done callback の設定（省略可能）

use crate::domain::ErrorContext;
use crate::ports::SubscriptionHandle;

pub type ErrorCallback<Err> = Box<dyn FnMut(Err, ErrorContext) + Send>;
pub type DoneCallback = Box<dyn FnOnce() + Send>;

/// Source は値の列を非同期に配送する
///
/// `listen` starts delivery right away; buffering and scheduling are the source's own
/// business. Errors do not end the subscription by themselves; the source decides when
/// it is done and then calls `Listener::done`.
pub trait Source: Send + 'static {
    type Item: Send + 'static;
    type Error: Send + 'static;

    fn listen(self, listener: Listener<Self::Item, Self::Error>) -> SubscriptionHandle;

    /// Human-readable name (for logs and `ErrorContext`).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Streamable は Source を直接ではなく内部に持つ
pub trait Streamable {
    type Source: Source;

    /// The underlying source to listen to.
    fn source(&self) -> Self::Source;
}

/// Optional error / done callbacks for a listener.
///
/// - `on_error` present → called with each error and its `ErrorContext`; absent → the
///   error is dropped.
/// - `on_done` present → called once when the source completes; absent → nothing.
pub struct ListenOptions<Err> {
    pub on_error: Option<ErrorCallback<Err>>,
    pub on_done: Option<DoneCallback>,
}

impl<Err> ListenOptions<Err> {
    pub fn new() -> Self {
        Self {
            on_error: None,
            on_done: None,
        }
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(Err, ErrorContext) + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_done<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_done = Some(Box::new(f));
        self
    }
}

impl<Err> Default for ListenOptions<Err> {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener は source から呼ばれる callback の束
///
/// Source implementations call `data`, `error` and `done`; the listener keeps the
/// delivery count used to build each `ErrorContext`.
pub struct Listener<T, Err> {
    source: &'static str,
    delivered: u64,
    on_data: Box<dyn FnMut(T) + Send>,
    on_error: Option<ErrorCallback<Err>>,
    on_done: Option<DoneCallback>,
}

impl<T, Err> Listener<T, Err> {
    pub fn new<F>(source: &'static str, on_data: F, options: ListenOptions<Err>) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        Self {
            source,
            delivered: 0,
            on_data: Box::new(on_data),
            on_error: options.on_error,
            on_done: options.on_done,
        }
    }

    pub fn data(&mut self, value: T) {
        self.delivered += 1;
        (self.on_data)(value);
    }

    pub fn error(&mut self, err: Err) {
        let context = ErrorContext::new(self.source, self.delivered);
        self.delivered += 1;
        match self.on_error.as_mut() {
            Some(on_error) => on_error(err, context),
            None => {
                tracing::debug!(source = self.source, index = context.index, "source error dropped");
            }
        }
    }

    /// Completion signal. Only the first call reaches `on_done`.
    pub fn done(&mut self) {
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }

    /// Number of values and errors delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn source_name(&self) -> &'static str {
        self.source
    }
}

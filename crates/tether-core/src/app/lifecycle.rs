//! LifecycleSink - subscription の寿命を sink の寿命に結び付ける
//!
//! sink を合成（composition）で包み、add はそのまま転送し、close を横取りします。
//!
//! # close の流れ
//! 1. CloseConfig に従って cancel（既定: 登録順に 1 件ずつ await）
//! 2. cancel が終わった subscription から追跡を外す（close が途中で drop されても残りは追跡されたまま）
//! 3. 内側の sink の close を呼ぶ
//! 4. 失敗があれば CloseError として返す

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::app::ReactOptions;
use crate::domain::{CancelOrder, CloseConfig, FailurePolicy, SinkId, SubscriptionId};
use crate::error::{CancelFailure, CloseError, SinkError};
use crate::ports::{ListenOptions, Listener, Sink, Source, Streamable, SubscriptionHandle};

#[derive(Clone)]
struct TrackedSubscription {
    id: SubscriptionId,
    source: &'static str,
    handle: SubscriptionHandle,
}

/// LifecycleSink は sink と、その sink 経由で作られた subscription を所有する
///
/// # 使用例
/// ```ignore
/// let sink = LifecycleSink::new(RecordingSink::new());
/// sink.react(StreamSource::infallible(ticks), |n| Event::Tick(n), ReactOptions::new());
/// sink.close().await?; // ticks の購読も cancel される
/// ```
///
/// # 注意
/// - close 後の attach と二重 close は検出しません（内側の sink の契約に従う）
/// - cancel にタイムアウトはありません。終わらない cancel は close を止めます
pub struct LifecycleSink<S, E> {
    id: SinkId,
    sink: Arc<S>,
    config: CloseConfig,
    tracked: Mutex<Vec<TrackedSubscription>>,
    _event: PhantomData<fn(E)>,
}

impl<S, E> LifecycleSink<S, E>
where
    S: Sink<E> + 'static,
    E: Send + 'static,
{
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, CloseConfig::default())
    }

    pub fn with_config(sink: S, config: CloseConfig) -> Self {
        Self::from_arc(Arc::new(sink), config)
    }

    /// Wrap a sink that is already shared elsewhere.
    pub fn from_arc(sink: Arc<S>, config: CloseConfig) -> Self {
        Self {
            id: SinkId::generate(),
            sink,
            config,
            tracked: Mutex::new(Vec::new()),
            _event: PhantomData,
        }
    }

    pub fn id(&self) -> SinkId {
        self.id
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn config(&self) -> CloseConfig {
        self.config
    }

    /// Number of subscriptions that will be cancelled by the next close.
    pub fn tracked_len(&self) -> usize {
        self.lock_tracked().len()
    }

    /// Forwarded untouched to the wrapped sink.
    pub fn add(&self, event: E) {
        self.sink.add(event);
    }

    /// Listen to `source` and cancel the subscription when this sink closes.
    ///
    /// The subscription is tracked before this returns. The returned handle is shared
    /// with the sink; cancelling it early is fine, close will cancel it again.
    pub fn listen<Src, F>(
        &self,
        source: Src,
        on_data: F,
        options: ListenOptions<Src::Error>,
    ) -> SubscriptionHandle
    where
        Src: Source,
        F: FnMut(Src::Item) + Send + 'static,
    {
        let name = source.name();
        let handle = source.listen(Listener::new(name, on_data, options));
        self.track(name, Arc::clone(&handle));
        handle
    }

    /// Same as `listen`, on the source exposed by `streamable`.
    pub fn listen_streamable<St, F>(
        &self,
        streamable: &St,
        on_data: F,
        options: ListenOptions<<St::Source as Source>::Error>,
    ) -> SubscriptionHandle
    where
        St: Streamable,
        F: FnMut(<St::Source as Source>::Item) + Send + 'static,
    {
        self.listen(streamable.source(), on_data, options)
    }

    /// Turn every value of `source` into an event and add it to the sink.
    ///
    /// `add` runs inside the source's delivery callback, so events keep the source's
    /// order. Errors and completion only produce events when `options` maps them to
    /// `Some`.
    pub fn react<Src, F>(
        &self,
        source: Src,
        mut on_data: F,
        options: ReactOptions<Src::Error, E>,
    ) -> SubscriptionHandle
    where
        Src: Source,
        F: FnMut(Src::Item) -> E + Send + 'static,
    {
        let ReactOptions { on_error, on_done } = options;
        let mut listen = ListenOptions::new();

        if let Some(mut map_error) = on_error {
            let sink = Arc::clone(&self.sink);
            listen = listen.on_error(move |err, context| {
                if let Some(event) = map_error(err, context) {
                    sink.add(event);
                }
            });
        }

        if let Some(map_done) = on_done {
            let sink = Arc::clone(&self.sink);
            listen = listen.on_done(move || {
                if let Some(event) = map_done() {
                    sink.add(event);
                }
            });
        }

        let sink = Arc::clone(&self.sink);
        self.listen(source, move |value| sink.add(on_data(value)), listen)
    }

    /// Same as `react`, on the source exposed by `streamable`.
    pub fn react_streamable<St, F>(
        &self,
        streamable: &St,
        on_data: F,
        options: ReactOptions<<St::Source as Source>::Error, E>,
    ) -> SubscriptionHandle
    where
        St: Streamable,
        F: FnMut(<St::Source as Source>::Item) -> E + Send + 'static,
    {
        self.react(streamable.source(), on_data, options)
    }

    /// Cancel every tracked subscription, then close the wrapped sink.
    ///
    /// An entry leaves the tracked set only once its cancellation has finished. If
    /// this future is dropped part way, the entries not yet cancelled stay tracked
    /// and the next close cancels them.
    pub async fn close(&self) -> Result<(), CloseError> {
        tracing::info!(
            sink = %self.id,
            subscriptions = self.tracked_len(),
            order = ?self.config.order,
            "closing sink"
        );

        let failures = match self.config.order {
            CancelOrder::Sequential => self.cancel_sequential().await,
            CancelOrder::Concurrent => self.cancel_concurrent().await,
        };

        if self.config.on_failure == FailurePolicy::Abort && !failures.is_empty() {
            tracing::warn!(sink = %self.id, failures = failures.len(), "close aborted; sink left open");
            return Err(CloseError::Aborted { failures });
        }

        let result = match (failures.is_empty(), self.sink.close().await) {
            (true, Ok(())) => Ok(()),
            (true, Err(sink)) => Err(CloseError::Sink(sink)),
            (false, Ok(())) => Err(CloseError::Cancellation { failures }),
            (false, Err(sink)) => Err(CloseError::Both { failures, sink }),
        };

        match &result {
            Ok(()) => tracing::info!(sink = %self.id, "sink closed"),
            Err(e) => tracing::warn!(sink = %self.id, error = %e, "sink closed with errors"),
        }
        result
    }

    async fn cancel_sequential(&self) -> Vec<CancelFailure> {
        let mut failures = Vec::new();

        while let Some(entry) = self.first_tracked() {
            let result = self.cancel_one(&entry).await;
            self.untrack(&[entry.id]);

            if let Err(failure) = result {
                failures.push(failure);
                if self.config.on_failure == FailurePolicy::Abort {
                    // 残りは cancel せずに追跡から外れる
                    let skipped = std::mem::take(&mut *self.lock_tracked()).len();
                    tracing::warn!(sink = %self.id, skipped, "remaining subscriptions not cancelled");
                    break;
                }
            }
        }
        failures
    }

    /// 全件を同時に cancel する。追跡から外すのは全件の完了後
    async fn cancel_concurrent(&self) -> Vec<CancelFailure> {
        let snapshot = self.lock_tracked().to_vec();
        let results =
            futures::future::join_all(snapshot.iter().map(|entry| self.cancel_one(entry))).await;

        let ids: Vec<SubscriptionId> = snapshot.iter().map(|entry| entry.id).collect();
        self.untrack(&ids);
        results.into_iter().filter_map(Result::err).collect()
    }

    async fn cancel_one(&self, entry: &TrackedSubscription) -> Result<(), CancelFailure> {
        tracing::debug!(
            sink = %self.id,
            subscription = %entry.id,
            source = entry.source,
            "cancelling subscription"
        );
        entry.handle.cancel().await.map_err(|err| {
            tracing::warn!(
                sink = %self.id,
                subscription = %entry.id,
                source = entry.source,
                error = %err,
                "cancellation failed"
            );
            CancelFailure {
                id: entry.id,
                source_name: entry.source,
                source: err,
            }
        })
    }

    // guard を await の前に手放すため、値を clone して返す
    fn first_tracked(&self) -> Option<TrackedSubscription> {
        self.lock_tracked().first().cloned()
    }

    fn untrack(&self, ids: &[SubscriptionId]) {
        self.lock_tracked().retain(|entry| !ids.contains(&entry.id));
    }

    fn track(&self, source: &'static str, handle: SubscriptionHandle) {
        let id = SubscriptionId::generate();
        let mut tracked = self.lock_tracked();
        tracked.push(TrackedSubscription { id, source, handle });
        tracing::debug!(
            sink = %self.id,
            subscription = %id,
            source,
            tracked = tracked.len(),
            "subscription attached"
        );
    }

    fn lock_tracked(&self) -> MutexGuard<'_, Vec<TrackedSubscription>> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<S, E> Sink<E> for LifecycleSink<S, E>
where
    S: Sink<E> + 'static,
    E: Send + 'static,
{
    fn add(&self, event: E) {
        self.sink.add(event);
    }

    async fn close(&self) -> Result<(), SinkError> {
        LifecycleSink::close(self)
            .await
            .map_err(|e| SinkError(e.to_string()))
    }
}

impl<S, E> Drop for LifecycleSink<S, E> {
    fn drop(&mut self) {
        let live = self
            .tracked
            .get_mut()
            .map(|t| t.len())
            .unwrap_or_else(|e| e.into_inner().len());
        if live > 0 {
            tracing::warn!(sink = %self.id, subscriptions = live, "sink dropped without close");
        }
    }
}

use std::time::Duration;

use futures::stream;
use tether_core::impls::{RecordingSink, StreamSource};
use tether_core::{CloseConfig, LifecycleSink, ReactOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
enum Event {
    Count(u32),
    Label(&'static str),
    Finished(&'static str),
}

/// Usage: tether-cli ['{"order":"concurrent","on_failure":"abort"}']
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) close の設定（引数があれば JSON として読む）
    let config: CloseConfig = match std::env::args().nth(1) {
        Some(json) => serde_json::from_str(&json)?,
        None => CloseConfig::default(),
    };
    println!("close config: {config:?}");

    // (B) sink を包む
    let sink = LifecycleSink::with_config(RecordingSink::<Event>::new(), config);

    // (C) 3 つの source を react で接続（1,2,3 / "a" / 空）
    sink.react(
        StreamSource::infallible(stream::iter(vec![1, 2, 3])).named("counter"),
        Event::Count,
        ReactOptions::new(),
    );
    sink.react(
        StreamSource::infallible(stream::iter(vec!["a"])).named("labels"),
        Event::Label,
        ReactOptions::new(),
    );
    sink.react(
        StreamSource::infallible(stream::empty::<u32>()).named("silent"),
        Event::Count,
        ReactOptions::new().on_done(|| Some(Event::Finished("silent"))),
    );
    println!("tracked subscriptions: {}", sink.tracked_len());

    // (D) 配送を待ってから close
    tokio::time::timeout(Duration::from_secs(5), sink.inner().wait_for(5)).await?;
    let result = sink.close().await;

    // (E) 結果
    for event in sink.inner().events() {
        println!("event: {event:?}");
    }
    match result {
        Ok(()) => println!("closed cleanly (inner closes: {})", sink.inner().close_count()),
        Err(e) => println!("closed with errors: {e}"),
    }
    Ok(())
}

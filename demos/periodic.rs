//! # Periodic Example
//!
//! Two listeners share one ticking producer; a `LogListener` is attached as
//! the debug listener. The ticker starts with the first listener and stops
//! one tick after the last one leaves.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example periodic
//! ```

use std::sync::Arc;
use std::time::Duration;

use relaystream::{ListenerRef, LogListener, PartialListener, Stream};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ticks: Stream<u64> = Stream::periodic(Duration::from_millis(200));
    ticks.set_debug(Arc::new(LogListener::new("ticks")));

    let fast: ListenerRef<u64> = PartialListener::new()
        .on_next(|n: &u64| println!("[fast] tick {n}"))
        .into_ref();
    let slow: ListenerRef<u64> = PartialListener::new()
        .on_next(|n: &u64| {
            if n % 2 == 0 {
                println!("[slow] even tick {n}");
            }
        })
        .into_ref();

    ticks.add_listener(Arc::clone(&fast));
    tokio::time::sleep(Duration::from_millis(450)).await;

    ticks.add_listener(Arc::clone(&slow));
    tokio::time::sleep(Duration::from_millis(600)).await;

    ticks.remove_listener(&fast);
    ticks.remove_listener(&slow);
    println!("[main] all listeners gone: {}", ticks.state());

    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("[main] final state: {}", ticks.state());
}

//! # Resubscribe Example
//!
//! Shows the deferred stop at work: a listener that leaves and is replaced
//! within the same turn does not restart the producer.
//!
//! The example prints:
//! - Each producer start/stop
//! - Values seen by each listener
//!
//! ## Run
//! ```bash
//! RUST_LOG=relaystream=debug cargo run --example resubscribe
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use relaystream::{ListenerRef, PartialListener, Producer, ProducerRef, Stream, StreamState};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Counter {
    starts: AtomicU32,
    sink: Mutex<Option<ListenerRef<u32>>>,
}

impl Counter {
    fn emit(&self, value: u32) {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.next(&value);
        }
    }
}

impl Producer<u32> for Counter {
    fn start(&self, sink: ListenerRef<u32>) {
        let n = self.starts.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[producer] start #{n}");
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn stop(&self) {
        println!("[producer] stop");
        self.sink.lock().unwrap().take();
    }
}

fn printer(name: &'static str) -> ListenerRef<u32> {
    PartialListener::new()
        .on_next(move |v: &u32| println!(" ├─► {name} got {v}"))
        .on_complete(move || println!(" └─► {name} complete"))
        .into_ref()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let producer = Arc::new(Counter::default());
    let shared: ProducerRef<u32> = producer.clone();
    let stream: Stream<u32> = Stream::builder()
        .name("counter")
        .producer_ref(shared)
        .build();

    let first = printer("first");
    stream.add_listener(Arc::clone(&first));
    producer.emit(1);

    // Swap listeners in one synchronous turn.
    stream.remove_listener(&first);
    println!("[stream] state after removal: {}", stream.state());
    let second = printer("second");
    stream.add_listener(Arc::clone(&second));
    println!("[stream] state after re-add: {}", stream.state());
    producer.emit(2);

    tokio::task::yield_now().await;

    stream.remove_listener(&second);
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(stream.state(), StreamState::Idle);

    println!();
    println!("Producer starts: {}", producer.starts.load(Ordering::Relaxed));
}

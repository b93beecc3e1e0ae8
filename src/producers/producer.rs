//! # Producer trait.
//!
//! A [`Producer`] is the single upstream source of a [`Stream`](crate::Stream).
//! The stream decides when it runs: `start` on the first listener, `stop` one
//! tick after the last listener leaves (or immediately on teardown).
//!
//! ## Lifecycle
//! ```text
//! Stream::add_listener (0 → 1) ──► producer.start(sink)
//!                                        │
//!                                        ▼  sink.next(&v) / sink.complete()
//!                                     Stream ──► listeners
//!
//! Stream::remove_listener (1 → 0) ──► [one tick] ──► producer.stop()
//! ```
//!
//! ## Rules
//! - `start` and `stop` alternate: a stream never starts a running producer.
//! - The sink is the stream itself. Release it in `stop`, otherwise the
//!   producer and the stream keep each other alive.
//! - A producer belongs to exactly one stream.

use std::sync::Arc;

use crate::error::StreamError;
use crate::listeners::ListenerRef;

/// # Demand-driven source of values.
///
/// # Example
/// ```
/// use std::sync::Mutex;
/// use relaystream::{ListenerRef, Producer};
///
/// #[derive(Default)]
/// struct Manual {
///     sink: Mutex<Option<ListenerRef<&'static str>>>,
/// }
///
/// impl Producer<&'static str> for Manual {
///     fn start(&self, sink: ListenerRef<&'static str>) {
///         sink.next(&"hello");
///         *self.sink.lock().unwrap() = Some(sink);
///     }
///
///     fn stop(&self) {
///         self.sink.lock().unwrap().take();
///     }
/// }
/// ```
pub trait Producer<T, E = StreamError>: Send + Sync + 'static {
    /// Begins emitting into `sink`.
    fn start(&self, sink: ListenerRef<T, E>);

    /// Stops emitting and releases the sink.
    fn stop(&self);
}

/// Shared producer handle.
pub type ProducerRef<T, E = StreamError> = Arc<dyn Producer<T, E>>;

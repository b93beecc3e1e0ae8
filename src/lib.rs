//! # relaystream
//!
//! **relaystream** is a minimal multicast stream for Rust.
//!
//! A [`Stream`] fans the values of one upstream [`Producer`] out to any number
//! of [`Listener`]s. The producer is demand-driven: it starts when the first
//! listener arrives and stops one runtime tick after the last one leaves, so a
//! listener swapped out and back in within the same turn never restarts it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐
//!     │   Producer   │  start(sink) / stop()
//!     └──────┬───────┘
//!            │ sink.next(&v) / sink.error(&e) / sink.complete()
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Stream (implements Listener itself)                              │
//! │  - ListenerSet (ordered, duplicates allowed, identity removal)    │
//! │  - debug listener (notified first)                                │
//! │  - PendingStop (one-tick deferred stop, cancellable)              │
//! │  - imitation target (forwards registrations)                      │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     Listener 1         Listener 2         Listener N
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──add──► Active ──remove last──► PendingStop ──tick──► Idle (producer stopped)
//!                  ▲                         │
//!                  └────────── add ──────────┘ (stop cancelled, producer kept)
//!
//! any ──error / complete──► teardown (stop producer, clear listeners) ──► Idle
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / traits                         |
//! |-----------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Streams**     | Multicast with demand-driven producer lifecycle.             | [`Stream`], [`StreamBuilder`], [`StreamState`] |
//! | **Listeners**   | Sink contract, closure-backed listeners with no-op defaults. | [`Listener`], [`PartialListener`], [`ListenerSet`] |
//! | **Producers**   | Upstream contract plus finite and periodic sources.          | [`Producer`], [`FromIter`], [`Periodic`]   |
//! | **Errors**      | Typed stream and wiring errors.                              | [`StreamError`], [`ImitateError`]          |
//! | **Configuration** | Per-stream name and error forwarding.                      | [`StreamConfig`]                           |
//!
//! ## Optional features
//! - `logging` _(default)_: exports [`LogListener`], a `tracing` debug listener.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use relaystream::{ListenerRef, PartialListener, Stream, StreamState};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ticks: Stream<u64> = Stream::periodic(Duration::from_millis(10));
//!
//!     let seen = Arc::new(Mutex::new(Vec::new()));
//!     let sink = Arc::clone(&seen);
//!     let listener: ListenerRef<u64> = PartialListener::new()
//!         .on_next(move |n: &u64| sink.lock().unwrap().push(*n))
//!         .into_ref();
//!
//!     ticks.add_listener(Arc::clone(&listener));
//!     tokio::time::sleep(Duration::from_millis(35)).await;
//!
//!     ticks.remove_listener(&listener);
//!     assert_eq!(ticks.state(), StreamState::PendingStop);
//!
//!     tokio::task::yield_now().await;
//!     assert!(!seen.lock().unwrap().is_empty());
//! }
//! ```
mod core;
mod error;
mod listeners;
mod producers;

// ---- Public re-exports ----

pub use self::core::{Stream, StreamBuilder, StreamConfig, StreamState};
pub use error::{ImitateError, StreamError};
pub use listeners::{same_listener, Listener, ListenerFn, ListenerRef, ListenerSet, PartialListener};
pub use producers::{FromIter, Periodic, Producer, ProducerRef};

// Optional: expose a `tracing`-backed debug listener.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "logging")]
pub use listeners::LogListener;

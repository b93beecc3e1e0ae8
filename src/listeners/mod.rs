//! # Stream listeners.
//!
//! This module provides the [`Listener`] trait and the pieces streams build on it.
//!
//! ## Contents
//! - [`Listener`], [`ListenerRef`] sink contract and shared handle
//! - [`PartialListener`], [`ListenerFn`] closure-backed listeners with no-op defaults
//! - [`ListenerSet`] ordered storage with identity removal and stable snapshots
//! - [`LogListener`] `tracing` printer, handy as a debug listener _(feature `logging`)_
//!
//! ## Implementing custom listeners
//! ```no_run
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use relaystream::{Listener, StreamError};
//!
//! #[derive(Default)]
//! struct Counter {
//!     seen: AtomicU64,
//! }
//!
//! impl Listener<String> for Counter {
//!     fn next(&self, _value: &String) {
//!         self.seen.fetch_add(1, Ordering::Relaxed);
//!     }
//!     fn error(&self, _err: &StreamError) {}
//!     fn complete(&self) {}
//! }
//! ```

mod listener;
mod listener_fn;
#[cfg(feature = "logging")]
mod log;
mod set;

pub use listener::{same_listener, Listener, ListenerRef};
pub use listener_fn::{ListenerFn, PartialListener};
#[cfg(feature = "logging")]
pub use log::LogListener;
pub use set::ListenerSet;

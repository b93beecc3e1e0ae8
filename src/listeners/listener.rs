//! # Listener trait.
//!
//! Provides [`Listener`], the sink contract every stream notification goes
//! through, and [`ListenerRef`], the shared handle streams store and compare.
//!
//! ## Rules
//! - Notifications are delivered synchronously, in the caller's context.
//! - A listener may re-enter the stream that notifies it (add/remove listeners,
//!   push values); the stream never holds its lock while calling out.
//! - Identity is the `Arc` allocation: registering the same [`ListenerRef`]
//!   twice yields two entries that [`remove_listener`](crate::Stream::remove_listener)
//!   removes one at a time.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use relaystream::{Listener, ListenerRef, Stream, StreamError};
//!
//! struct Printer;
//!
//! impl Listener<u32> for Printer {
//!     fn next(&self, value: &u32) { println!("got {value}"); }
//!     fn error(&self, err: &StreamError) { eprintln!("failed: {err}"); }
//!     fn complete(&self) { println!("done"); }
//! }
//!
//! let stream: Stream<u32> = Stream::relay();
//! let printer: ListenerRef<u32> = Arc::new(Printer);
//! stream.add_listener(Arc::clone(&printer));
//! stream.next(&7);
//! stream.remove_listener(&printer);
//! ```

use std::sync::Arc;

use crate::error::StreamError;

/// Sink for stream notifications.
///
/// A [`Stream`](crate::Stream) implements this trait itself, so it can be
/// handed to its [`Producer`](crate::Producer) as the sink or registered on
/// another stream.
///
/// For closure-backed listeners where only some callbacks matter, see
/// [`PartialListener`](crate::PartialListener).
pub trait Listener<T, E = StreamError>: Send + Sync + 'static {
    /// Receives one value.
    fn next(&self, value: &T);

    /// Receives an error payload.
    fn error(&self, err: &E);

    /// Receives the end-of-stream signal.
    fn complete(&self);
}

/// Shared listener handle, compared by allocation identity.
pub type ListenerRef<T, E = StreamError> = Arc<dyn Listener<T, E>>;

/// Returns `true` when both handles point to the same listener allocation.
///
/// Only the data address is compared; vtable pointers of the same type may
/// differ between codegen units.
#[inline]
pub fn same_listener<T, E>(a: &ListenerRef<T, E>, b: &ListenerRef<T, E>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

//! Stream core: registration, fan-out and producer lifecycle.
//!
//! The only public types from this module are [`Stream`], its
//! [`StreamBuilder`], [`StreamConfig`] and [`StreamState`].
//!
//! Internal modules:
//! - [`stream`]: listener registration, fan-out, teardown, imitation;
//! - [`pending`]: the cancellable deferred-stop handle;
//! - [`builder`]: consuming builder over [`StreamConfig`] and optional parts;
//! - [`state`]: lifecycle states reported by [`Stream::state`].

mod builder;
mod config;
mod pending;
mod state;
mod stream;

pub use builder::StreamBuilder;
pub use config::StreamConfig;
pub use state::StreamState;
pub use stream::Stream;

//! # LogListener: notification printer
//!
//! A minimal listener that writes every notification as a `tracing` event.
//! Attach it as a stream's debug listener while developing.
//!
//! ## Example output (with a `fmt` subscriber)
//! ```text
//! DEBUG relaystream::listener::log: next stream=clicks value=3
//! WARN  relaystream::listener::log: error stream=clicks err=Producer { reason: "socket closed" }
//! DEBUG relaystream::listener::log: complete stream=clicks
//! ```

use std::borrow::Cow;
use std::fmt::Debug;

use tracing::{debug, warn};

use crate::listeners::Listener;

/// Listener that logs notifications through `tracing`.
#[derive(Debug, Clone)]
pub struct LogListener {
    name: Cow<'static, str>,
}

impl LogListener {
    /// Target used for every event this listener emits.
    pub const TARGET: &'static str = "relaystream::listener::log";

    /// Construct a new [`LogListener`] labelled with `name`.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// The label attached to every event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for LogListener {
    fn default() -> Self {
        Self::new("stream")
    }
}

impl<T, E> Listener<T, E> for LogListener
where
    T: Debug + 'static,
    E: Debug + 'static,
{
    fn next(&self, value: &T) {
        debug!(target: LogListener::TARGET, stream = %self.name, value = ?value, "next");
    }

    fn error(&self, err: &E) {
        warn!(target: LogListener::TARGET, stream = %self.name, err = ?err, "error");
    }

    fn complete(&self) {
        debug!(target: LogListener::TARGET, stream = %self.name, "complete");
    }
}

//! # Per-stream configuration.
//!
//! Provides [`StreamConfig`], the settings a [`Stream`](crate::Stream) is built with.
//!
//! Config is used in two ways:
//! 1. **Direct construction**: `Stream::with_config(config, producer)`
//! 2. **Builder**: `Stream::builder().name("clicks").forward_errors(true).build()`

use std::borrow::Cow;

/// Configuration for a single stream.
///
/// ## Field semantics
/// - `name`: label attached to every log record the stream emits
/// - `forward_errors`: whether `error(&e)` notifies listeners after teardown
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Human-readable stream name used in `tracing` fields and error messages.
    pub name: Cow<'static, str>,

    /// Forward error payloads to listeners.
    ///
    /// - `false` (default): `error` tears the stream down silently; listeners
    ///   never observe the payload.
    /// - `true`: after teardown, the debug listener and every listener
    ///   registered at call time receive `error(&e)` exactly once.
    pub forward_errors: bool,
}

impl StreamConfig {
    /// Creates a default configuration with the given name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for StreamConfig {
    /// Default configuration:
    ///
    /// - `name = "stream"`
    /// - `forward_errors = false`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("stream"),
            forward_errors: false,
        }
    }
}

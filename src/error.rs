//! Error types used by streams and their collaborators.
//!
//! This module defines two enums:
//!
//! - [`StreamError`]: the default payload carried by [`Listener::error`](crate::Listener::error)
//!   notifications (stream-level errors reported by producers or upstream code).
//! - [`ImitateError`]: precondition failures when wiring one stream to imitate another.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

/// # Stream-level error payload.
///
/// Streams are generic over their error type; this is the default one.
/// Reporting an error to a [`Stream`](crate::Stream) tears it down
/// (see [`StreamConfig::forward_errors`](crate::StreamConfig::forward_errors)
/// for whether the payload reaches listeners).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The producer failed while emitting values.
    #[error("producer failed: {reason}")]
    Producer {
        /// The underlying error message.
        reason: String,
    },

    /// An upstream stream or external source reported a failure.
    #[error("upstream failed: {reason}")]
    Upstream {
        /// The underlying error message.
        reason: String,
    },
}

impl StreamError {
    /// Shorthand for [`StreamError::Producer`].
    pub fn producer(reason: impl Into<String>) -> Self {
        StreamError::Producer {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`StreamError::Upstream`].
    pub fn upstream(reason: impl Into<String>) -> Self {
        StreamError::Upstream {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use relaystream::StreamError;
    ///
    /// let err = StreamError::producer("socket closed");
    /// assert_eq!(err.as_label(), "stream_producer_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StreamError::Producer { .. } => "stream_producer_failed",
            StreamError::Upstream { .. } => "stream_upstream_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StreamError::Producer { reason } => format!("producer: {reason}"),
            StreamError::Upstream { reason } => format!("upstream: {reason}"),
        }
    }
}

/// # Errors produced when installing an imitation target.
///
/// A stream that imitates another forwards every registration to it, so the
/// target chain must never lead back to the imitating stream.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImitateError {
    /// The stream was asked to imitate itself.
    #[error("stream '{stream}' cannot imitate itself")]
    SelfImitation {
        /// Name of the offending stream.
        stream: String,
    },

    /// The target (directly or through its own targets) imitates this stream.
    #[error("imitating '{target}' from '{stream}' would create a cycle")]
    Cycle {
        /// Name of the imitating stream.
        stream: String,
        /// Name of the requested target.
        target: String,
    },

    /// The stream already has listeners of its own; they would stop receiving values.
    #[error("stream '{stream}' has {listeners} listener(s) and cannot start imitating")]
    HasListeners {
        /// Name of the imitating stream.
        stream: String,
        /// Number of listeners currently registered on it.
        listeners: usize,
    },
}

impl ImitateError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use relaystream::ImitateError;
    ///
    /// let err = ImitateError::SelfImitation { stream: "clicks".into() };
    /// assert_eq!(err.as_label(), "imitate_self");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ImitateError::SelfImitation { .. } => "imitate_self",
            ImitateError::Cycle { .. } => "imitate_cycle",
            ImitateError::HasListeners { .. } => "imitate_has_listeners",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ImitateError::SelfImitation { stream } => format!("self-imitation: {stream}"),
            ImitateError::Cycle { stream, target } => {
                format!("cycle: {stream} -> {target} -> ... -> {stream}")
            }
            ImitateError::HasListeners { stream, listeners } => {
                format!("{stream} still has {listeners} listener(s)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_labels_are_stable() {
        assert_eq!(StreamError::producer("x").as_label(), "stream_producer_failed");
        assert_eq!(StreamError::upstream("x").as_label(), "stream_upstream_failed");
    }

    #[test]
    fn test_stream_error_display() {
        let err = StreamError::producer("socket closed");
        assert_eq!(err.to_string(), "producer failed: socket closed");
        assert_eq!(err.as_message(), "producer: socket closed");
    }

    #[test]
    fn test_imitate_error_display() {
        let err = ImitateError::Cycle {
            stream: "a".into(),
            target: "b".into(),
        };
        assert_eq!(err.to_string(), "imitating 'b' from 'a' would create a cycle");
        assert_eq!(err.as_label(), "imitate_cycle");
    }
}

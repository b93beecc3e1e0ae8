//! Observable lifecycle state of a stream.

use std::fmt;

/// Where a [`Stream`](crate::Stream) is in its activation lifecycle.
///
/// ```text
///           add (0 → 1)                  remove (1 → 0)
///   Idle ──────────────► Active ◄──────────────────────► PendingStop
///    ▲   (start producer)          add (cancel stop)          │
///    │                                                         │ tick (stop producer)
///    └─────────────────────────────────────────────────────────┘
///   any ── error / complete ──► Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// No listeners; producer not running.
    Idle,
    /// At least one listener; producer running (if bound).
    Active,
    /// No listeners; producer still running until the deferred stop fires.
    PendingStop,
}

impl StreamState {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StreamState::Idle => "idle",
            StreamState::Active => "active",
            StreamState::PendingStop => "pending_stop",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

//! # Deferred-stop handle.
//!
//! When a stream loses its last listener it does not stop its producer right
//! away. It spawns a one-tick task and keeps a [`PendingStop`] for it:
//!
//! ```text
//! remove_listener (1 → 0) ──► spawn ──► yield once ──► stop_now(id)
//!                                 ▲
//! add_listener (0 → 1) ───────────┴── PendingStop::cancel() (token)
//! ```
//!
//! The task re-checks the stream's armed id under the lock before stopping, so
//! a cancelled or superseded handle can never stop a producer.

use tokio_util::sync::CancellationToken;

/// Handle to one scheduled deferred stop.
///
/// Cancellation is explicit through [`PendingStop::cancel`]; dropping a handle
/// does not cancel the task.
#[derive(Debug)]
pub(crate) struct PendingStop {
    id: u64,
    token: CancellationToken,
}

impl PendingStop {
    pub(crate) fn new(id: u64, token: CancellationToken) -> Self {
        Self { id, token }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Prevents the scheduled stop from running.
    pub(crate) fn cancel(self) {
        self.token.cancel();
    }
}

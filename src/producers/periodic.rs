//! # Periodic: counter ticking on the Tokio timer
//!
//! [`Periodic`] emits `0, 1, 2, …` every `period` while started. Each `start`
//! spawns a ticker task bound to a fresh [`CancellationToken`]; `stop` cancels
//! it. The count restarts from zero on every activation.
//!
//! ## Architecture
//! ```text
//! start(sink) ──► spawn ──► loop { select! { cancelled => exit, tick => sink.next(&n) } }
//! stop()      ──► token.cancel()
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::select;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::core::Stream;
use crate::listeners::ListenerRef;
use crate::producers::Producer;

/// Interval producer emitting a monotonically increasing counter.
#[derive(Debug)]
pub struct Periodic {
    period: Duration,
    running: Mutex<Option<CancellationToken>>,
}

impl Periodic {
    /// Creates a producer ticking every `period` (clamped to at least 1ms).
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            running: Mutex::new(None),
        }
    }

    /// The tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// True while a ticker task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<E> Producer<u64, E> for Periodic
where
    E: 'static,
{
    fn start(&self, sink: ListenerRef<u64, E>) {
        let Ok(handle) = Handle::try_current() else {
            warn!(period = ?self.period, "periodic producer started outside a Tokio runtime; not ticking");
            return;
        };

        let token = CancellationToken::new();
        let previous = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let period = self.period;
        handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut n: u64 = 0;
            loop {
                select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        sink.next(&n);
                        n += 1;
                    }
                }
            }
            trace!(ticks = n, "periodic ticker exited");
        });
    }

    fn stop(&self) {
        if let Some(token) = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }
}

impl<E> Stream<u64, E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Creates a stream backed by a [`Periodic`] producer.
    pub fn periodic(period: Duration) -> Self {
        Stream::new(Arc::new(Periodic::new(period)))
    }
}

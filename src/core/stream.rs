//! # Stream: one producer, many listeners.
//!
//! [`Stream`] multicasts the values of a single [`Producer`](crate::Producer)
//! to every registered [`Listener`]. The producer runs only while someone
//! listens:
//!
//! ```text
//! add_listener ──► ListenerSet ──(0 → 1)──► producer.start(stream as sink)
//!                                                    │
//!                      ┌─────────────────────────────┘ sink.next(&v)
//!                      ▼
//!                Stream::next ──► debug ──► L1 ──► L2 ──► … (registration order)
//!
//! remove_listener ──(1 → 0)──► arm PendingStop ──[tick]──► producer.stop()
//!                                     ▲
//! add_listener (0 → 1) ───────────────┘ cancels it; producer is reused
//! ```
//!
//! ## Rules
//! - Every operation runs to completion synchronously; the deferred stop is
//!   the only work scheduled on the Tokio runtime.
//! - The state lock is never held while calling listeners or the producer, so
//!   callbacks may re-enter the stream. Fan-out iterates a snapshot taken when
//!   the notification starts.
//! - `error` and `complete` tear down (stop producer, clear listeners) before
//!   notifying; a listener that re-subscribes from there restarts the producer.
//! - Producer `start`/`stop` calls strictly alternate. One caller at a time
//!   drives the producer; a demand change made while a call is in progress
//!   is picked up by that caller once the call returns.
//! - An imitating stream forwards `add_listener`/`remove_listener` to its
//!   target and stores nothing itself.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::StreamBuilder;
use super::config::StreamConfig;
use super::pending::PendingStop;
use super::state::StreamState;
use crate::error::{ImitateError, StreamError};
use crate::listeners::{Listener, ListenerRef, ListenerSet, PartialListener};
use crate::producers::ProducerRef;

/// Demand-driven multicast stream.
///
/// Cheap to clone: clones share the same listeners, producer and state.
///
/// # Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use relaystream::{ListenerRef, PartialListener, Stream};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let stream: Stream<char> = Stream::from_items(['a', 'b']);
/// let listener: ListenerRef<char> = PartialListener::new()
///     .on_next(move |c: &char| sink.lock().unwrap().push(*c))
///     .into_ref();
///
/// stream.add_listener(listener);
/// assert_eq!(*seen.lock().unwrap(), vec!['a', 'b']);
/// ```
pub struct Stream<T, E = StreamError> {
    inner: Arc<Inner<T, E>>,
}

struct Inner<T, E> {
    config: StreamConfig,
    producer: Option<ProducerRef<T, E>>,
    state: Mutex<State<T, E>>,
}

struct State<T, E> {
    listeners: ListenerSet<T, E>,
    debug: Option<ListenerRef<T, E>>,
    /// `Some` while an `error` call is being processed.
    error_marker: Option<E>,
    /// Present iff the stream is in [`StreamState::PendingStop`].
    pending_stop: Option<PendingStop>,
    target: Option<Stream<T, E>>,
    stop_seq: u64,
    /// Whether the producer was last started (`true`) or stopped (`false`).
    producer_live: bool,
    /// Set while some caller is inside `producer.start`/`producer.stop`.
    driving: bool,
    /// The producer must be stopped even if demand comes back first.
    cycle: bool,
}

impl<T, E> State<T, E> {
    fn has_demand(&self) -> bool {
        !self.listeners.is_empty() || self.pending_stop.is_some()
    }
}

/// Producer call decided under the lock and made outside it.
enum Transition {
    Start,
    Stop,
}

impl<T, E> Clone for Stream<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Stream<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a stream driven by `producer`, with default configuration.
    pub fn new(producer: ProducerRef<T, E>) -> Self {
        Self::with_config(StreamConfig::default(), Some(producer))
    }

    /// Creates a producer-less stream: values arrive only through [`Stream::next`].
    pub fn relay() -> Self {
        Self::with_config(StreamConfig::default(), None)
    }

    /// Creates a stream with an explicit configuration.
    pub fn with_config(config: StreamConfig, producer: Option<ProducerRef<T, E>>) -> Self {
        Self::from_parts(config, producer, None, None)
    }

    /// Returns a builder for streams that need more than a producer.
    pub fn builder() -> StreamBuilder<T, E> {
        StreamBuilder::new()
    }

    pub(crate) fn from_parts(
        config: StreamConfig,
        producer: Option<ProducerRef<T, E>>,
        target: Option<Stream<T, E>>,
        debug: Option<ListenerRef<T, E>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                producer,
                state: Mutex::new(State {
                    listeners: ListenerSet::new(),
                    debug,
                    error_marker: None,
                    pending_stop: None,
                    target,
                    stop_seq: 0,
                    producer_live: false,
                    driving: false,
                    cycle: false,
                }),
            }),
        }
    }

    /// The configured stream name.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// The configuration this stream was built with.
    pub fn config(&self) -> &StreamConfig {
        &self.inner.config
    }

    /// True if a producer is bound.
    pub fn has_producer(&self) -> bool {
        self.inner.producer.is_some()
    }

    /// Current lifecycle state of this stream's own listener set.
    ///
    /// An imitating stream reports its own (empty) set; ask the target instead.
    pub fn state(&self) -> StreamState {
        let st = self.lock();
        if st.pending_stop.is_some() {
            StreamState::PendingStop
        } else if st.listeners.is_empty() {
            StreamState::Idle
        } else {
            StreamState::Active
        }
    }

    /// Number of listeners registered directly on this stream.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// True if registrations are forwarded to another stream.
    pub fn is_imitating(&self) -> bool {
        self.lock().target.is_some()
    }

    /// True if both handles refer to the same stream.
    pub fn ptr_eq(&self, other: &Stream<T, E>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Registers a listener.
    ///
    /// The first listener starts the producer, unless a deferred stop is still
    /// pending, in which case the stop is cancelled and the running producer
    /// is kept.
    pub fn add_listener(&self, listener: ListenerRef<T, E>) {
        if let Some(target) = self.target() {
            target.add_listener(listener);
            return;
        }

        {
            let mut st = self.lock();
            if st.listeners.push(listener) > 1 {
                return;
            }
            if let Some(pending) = st.pending_stop.take() {
                debug!(stream = %self.name(), stop_id = pending.id(), "deferred stop cancelled; producer kept");
                pending.cancel();
                return;
            }
        }

        self.drive_producer();
    }

    /// Normalizes `partial` and registers it.
    ///
    /// Returns the stored handle; pass it to [`Stream::remove_listener`] later.
    pub fn add_partial(&self, partial: PartialListener<T, E>) -> ListenerRef<T, E> {
        let listener = partial.into_ref();
        self.add_listener(Arc::clone(&listener));
        listener
    }

    /// Removes one registration of `listener` (first match by identity).
    ///
    /// Removing the last listener of a stream with a producer arms a deferred
    /// stop that fires one runtime tick later.
    ///
    /// # Without a Tokio runtime
    /// There is nothing to defer the stop onto, so the producer is stopped
    /// before this call returns and a warning is logged. The debounce is lost
    /// in that case: removing the last listener and adding one back in the
    /// same turn restarts the producer. Call this from within a runtime to
    /// keep the producer across such a swap.
    pub fn remove_listener(&self, listener: &ListenerRef<T, E>) {
        if let Some(target) = self.target() {
            target.remove_listener(listener);
            return;
        }

        {
            let mut st = self.lock();
            if !st.listeners.remove(listener) || !st.listeners.is_empty() {
                return;
            }
            if self.inner.producer.is_none() {
                return;
            }
            self.arm_stop(&mut st);
        }

        self.drive_producer();
    }

    /// Attaches a listener notified before all others, outside the listener set.
    ///
    /// It does not count towards activation and survives teardown.
    pub fn set_debug(&self, listener: ListenerRef<T, E>) {
        self.lock().debug = Some(listener);
    }

    /// Detaches the debug listener, returning it.
    pub fn clear_debug(&self) -> Option<ListenerRef<T, E>> {
        self.lock().debug.take()
    }

    /// Forwards all future registrations to `target`.
    ///
    /// # Errors
    /// - [`ImitateError::SelfImitation`] if `target` is this stream.
    /// - [`ImitateError::Cycle`] if `target`'s imitation chain reaches this stream.
    /// - [`ImitateError::HasListeners`] if this stream has listeners of its own.
    pub fn imitate(&self, target: &Stream<T, E>) -> Result<(), ImitateError> {
        if self.ptr_eq(target) {
            return Err(ImitateError::SelfImitation {
                stream: self.name().to_string(),
            });
        }

        let mut cursor = target.target();
        while let Some(next) = cursor {
            if self.ptr_eq(&next) {
                return Err(ImitateError::Cycle {
                    stream: self.name().to_string(),
                    target: target.name().to_string(),
                });
            }
            cursor = next.target();
        }

        let mut st = self.lock();
        if !st.listeners.is_empty() {
            return Err(ImitateError::HasListeners {
                stream: self.name().to_string(),
                listeners: st.listeners.len(),
            });
        }
        st.target = Some(target.clone());
        debug!(stream = %self.name(), target = %target.name(), "imitating");
        Ok(())
    }

    /// Delivers `value` to the debug listener, then to every listener in
    /// registration order.
    pub fn next(&self, value: &T) {
        let (debug, listeners) = {
            let st = self.lock();
            (st.debug.clone(), st.listeners.snapshot())
        };

        if let Some(debug) = debug {
            debug.next(value);
        }
        for listener in &listeners {
            listener.next(value);
        }
    }

    /// Tears the stream down.
    ///
    /// Re-entrant calls made while an error is being processed are ignored.
    /// The payload reaches listeners only when
    /// [`StreamConfig::forward_errors`] is set.
    pub fn error(&self, err: &E) {
        {
            let mut st = self.lock();
            if st.error_marker.is_some() {
                trace!(stream = %self.name(), "error already in flight; ignored");
                return;
            }
            st.error_marker = Some(err.clone());
        }

        let listeners = self.tear_down("error");

        if self.inner.config.forward_errors {
            let debug = self.lock().debug.clone();
            if let Some(debug) = debug {
                debug.error(err);
            }
            for listener in &listeners {
                listener.error(err);
            }
        }

        self.lock().error_marker = None;
    }

    /// Tears the stream down, then notifies the debug listener and every
    /// listener registered at call time.
    pub fn complete(&self) {
        let listeners = self.tear_down("complete");

        let debug = self.lock().debug.clone();
        if let Some(debug) = debug {
            debug.complete();
        }
        for listener in &listeners {
            listener.complete();
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T, E>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn target(&self) -> Option<Stream<T, E>> {
        self.lock().target.clone()
    }

    fn as_sink(&self) -> ListenerRef<T, E> {
        Arc::new(self.clone())
    }

    /// Schedules `stop_now` one tick later and records its handle.
    ///
    /// Without a runtime nothing is armed; the caller's `drive_producer` then
    /// sees no demand and stops the producer right away.
    fn arm_stop(&self, st: &mut State<T, E>) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(stream = %self.name(), "no Tokio runtime to defer the stop; stopping producer now");
                st.error_marker = None;
                return;
            }
        };

        st.stop_seq += 1;
        let id = st.stop_seq;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let stream = self.clone();

        handle.spawn(async move {
            select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = tokio::task::yield_now() => stream.stop_now(id),
            }
        });

        st.pending_stop = Some(PendingStop::new(id, token));
        trace!(stream = %self.name(), stop_id = id, "last listener removed; deferred stop armed");
    }

    fn stop_now(&self, id: u64) {
        {
            let mut st = self.lock();
            match &st.pending_stop {
                Some(pending) if pending.id() == id => {}
                _ => {
                    trace!(stream = %self.name(), stop_id = id, "stale deferred stop skipped");
                    return;
                }
            }
            st.pending_stop = None;
            st.error_marker = None;
        }

        debug!(stream = %self.name(), stop_id = id, "deferred stop fired");
        self.drive_producer();
    }

    /// Cancels any pending stop, stops the producer if it is considered
    /// active, and empties the listener set. Returns the removed listeners.
    fn tear_down(&self, cause: &'static str) -> Vec<ListenerRef<T, E>> {
        let listeners = {
            let mut st = self.lock();
            let pending = st.pending_stop.take();
            if st.listeners.is_empty() && pending.is_none() {
                return Vec::new();
            }
            if let Some(pending) = pending {
                pending.cancel();
            }
            if st.producer_live {
                st.cycle = true;
            }
            st.listeners.take()
        };

        debug!(stream = %self.name(), cause, listeners = listeners.len(), "tearing down");
        self.drive_producer();
        listeners
    }

    /// Starts or stops the producer until it matches the current demand.
    ///
    /// Returns at once if another call is already driving; that caller
    /// re-reads the demand after each transition, so the change made by
    /// this one is not lost.
    fn drive_producer(&self) {
        let Some(producer) = self.inner.producer.as_ref() else {
            return;
        };
        {
            let mut st = self.lock();
            if st.driving {
                trace!(stream = %self.name(), "producer transition in progress; handed off");
                return;
            }
            st.driving = true;
        }

        loop {
            let step = {
                let mut st = self.lock();
                let demand = st.has_demand();
                if st.producer_live && (!demand || st.cycle) {
                    st.producer_live = false;
                    st.cycle = false;
                    Transition::Stop
                } else if !st.producer_live && demand {
                    st.producer_live = true;
                    Transition::Start
                } else {
                    st.cycle = false;
                    st.driving = false;
                    return;
                }
            };

            match step {
                Transition::Start => {
                    debug!(stream = %self.name(), "listeners present; starting producer");
                    producer.start(self.as_sink());
                }
                Transition::Stop => {
                    debug!(stream = %self.name(), "no demand; stopping producer");
                    producer.stop();
                }
            }
        }
    }
}

impl<T, E> Listener<T, E> for Stream<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn next(&self, value: &T) {
        Stream::next(self, value)
    }

    fn error(&self, err: &E) {
        Stream::error(self, err)
    }

    fn complete(&self) {
        Stream::complete(self)
    }
}

impl<T, E> fmt::Debug for Stream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Stream");
        s.field("name", &self.inner.config.name)
            .field("producer", &self.inner.producer.is_some());
        // Debug may run inside a callback that already holds the lock.
        match self.inner.state.try_lock() {
            Ok(st) => s
                .field("listeners", &st.listeners.len())
                .field("pending_stop", &st.pending_stop.is_some())
                .field("producer_live", &st.producer_live)
                .field("imitating", &st.target.is_some()),
            Err(_) => s.field("state", &"<locked>"),
        };
        s.finish()
    }
}

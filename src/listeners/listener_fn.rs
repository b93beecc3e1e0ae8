//! # Closure-backed listeners (`PartialListener` → `ListenerFn`)
//!
//! [`PartialListener`] is a record of optional callbacks: callers set only the
//! notifications they care about. [`PartialListener::normalize`] turns it into
//! a fully-populated [`ListenerFn`], replacing every missing callback with a
//! no-op. Normalization is pure: it allocates nothing beyond the no-op boxes and
//! calls nothing.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use relaystream::{ListenerRef, PartialListener, Stream};
//!
//! let sum = Arc::new(AtomicU32::new(0));
//! let acc = Arc::clone(&sum);
//!
//! let stream: Stream<u32> = Stream::relay();
//! let listener: ListenerRef<u32> = PartialListener::new()
//!     .on_next(move |v: &u32| { acc.fetch_add(*v, Ordering::Relaxed); })
//!     .into_ref();
//!
//! stream.add_listener(Arc::clone(&listener));
//! stream.next(&2);
//! stream.next(&3);
//! assert_eq!(sum.load(Ordering::Relaxed), 5);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::StreamError;
use crate::listeners::listener::{Listener, ListenerRef};

type NextFn<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorFn<E> = Box<dyn Fn(&E) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

fn ignore<V>(_: &V) {}

/// Listener record in which every callback is optional.
pub struct PartialListener<T, E = StreamError> {
    next: Option<NextFn<T>>,
    error: Option<ErrorFn<E>>,
    complete: Option<CompleteFn>,
}

impl<T, E> PartialListener<T, E> {
    /// Creates an empty record (all callbacks missing).
    pub fn new() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }

    /// Sets the `next` callback.
    pub fn on_next(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.next = Some(Box::new(f));
        self
    }

    /// Sets the `error` callback.
    pub fn on_error(mut self, f: impl Fn(&E) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Sets the `complete` callback.
    pub fn on_complete(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    /// Fills every missing callback with a no-op.
    pub fn normalize(self) -> ListenerFn<T, E>
    where
        T: 'static,
        E: 'static,
    {
        let next: NextFn<T> = match self.next {
            Some(f) => f,
            None => Box::new(ignore::<T>),
        };
        let error: ErrorFn<E> = match self.error {
            Some(f) => f,
            None => Box::new(ignore::<E>),
        };
        let complete: CompleteFn = match self.complete {
            Some(f) => f,
            None => Box::new(|| {}),
        };
        ListenerFn {
            next,
            error,
            complete,
        }
    }

    /// Normalizes and wraps the listener in a shared handle.
    pub fn into_ref(self) -> ListenerRef<T, E>
    where
        T: 'static,
        E: 'static,
    {
        Arc::new(self.normalize())
    }
}

impl<T, E> Default for PartialListener<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for PartialListener<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialListener")
            .field("next", &self.next.is_some())
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}

/// Fully-populated closure-backed listener.
///
/// Built by [`PartialListener::normalize`]; every callback is present.
pub struct ListenerFn<T, E = StreamError> {
    next: NextFn<T>,
    error: ErrorFn<E>,
    complete: CompleteFn,
}

impl<T, E> fmt::Debug for ListenerFn<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerFn").finish_non_exhaustive()
    }
}

impl<T, E> Listener<T, E> for ListenerFn<T, E>
where
    T: 'static,
    E: 'static,
{
    fn next(&self, value: &T) {
        (self.next)(value)
    }

    fn error(&self, err: &E) {
        (self.error)(err)
    }

    fn complete(&self) {
        (self.complete)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_normalize_keeps_supplied_callbacks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (s1, s2, s3) = (Arc::clone(&seen), Arc::clone(&seen), Arc::clone(&seen));

        let l: ListenerFn<i32, String> = PartialListener::new()
            .on_next(move |v: &i32| s1.lock().unwrap().push(format!("next:{v}")))
            .on_error(move |e: &String| s2.lock().unwrap().push(format!("error:{e}")))
            .on_complete(move || s3.lock().unwrap().push("complete".into()))
            .normalize();

        l.next(&1);
        l.error(&"boom".to_string());
        l.complete();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["next:1", "error:boom", "complete"]
        );
    }

    #[test]
    fn test_normalize_fills_missing_with_noops() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);

        let l: ListenerFn<i32> = PartialListener::new()
            .on_next(move |v: &i32| s.lock().unwrap().push(*v))
            .normalize();

        l.error(&StreamError::producer("ignored"));
        l.complete();
        l.next(&9);

        assert_eq!(*seen.lock().unwrap(), vec![9]);
    }

    #[test]
    fn test_empty_partial_is_inert() {
        let l: ListenerFn<i32> = PartialListener::default().normalize();
        l.next(&1);
        l.error(&StreamError::upstream("x"));
        l.complete();
    }

    #[test]
    fn test_debug_reports_present_callbacks() {
        let p: PartialListener<i32> = PartialListener::new().on_complete(|| {});
        assert_eq!(
            format!("{p:?}"),
            "PartialListener { next: false, error: false, complete: true }"
        );
    }
}

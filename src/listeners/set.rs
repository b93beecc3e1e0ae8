//! # ListenerSet: ordered, identity-addressed listener storage
//!
//! [`ListenerSet`] holds the listeners a [`Stream`](crate::Stream) fans out to.
//!
//! ## What it guarantees
//! - Insertion order is notification order.
//! - Duplicates are kept as separate entries.
//! - [`remove`](ListenerSet::remove) drops exactly the first entry with the same identity.
//! - [`snapshot`](ListenerSet::snapshot) is stable: later mutations do not affect
//!   a fan-out already in progress.
//!
//! ## Diagram
//! ```text
//!    next(&v)
//!        │                 (snapshot of Arc handles)
//!        ├──────────────► L1.next(&v)
//!        ├──────────────► L2.next(&v)
//!        └──────────────► LN.next(&v)
//! ```

use std::fmt;

use crate::error::StreamError;
use crate::listeners::listener::{same_listener, ListenerRef};

/// Ordered multiset of listener handles.
pub struct ListenerSet<T, E = StreamError> {
    entries: Vec<ListenerRef<T, E>>,
}

impl<T, E> ListenerSet<T, E> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a listener and returns the new number of entries.
    pub fn push(&mut self, listener: ListenerRef<T, E>) -> usize {
        self.entries.push(listener);
        self.entries.len()
    }

    /// Removes the first entry with the same identity as `listener`.
    ///
    /// Returns `false` if no such entry exists.
    pub fn remove(&mut self, listener: &ListenerRef<T, E>) -> bool {
        match self
            .entries
            .iter()
            .position(|entry| same_listener(entry, listener))
        {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// True if an entry with the same identity is present.
    #[must_use]
    pub fn contains(&self, listener: &ListenerRef<T, E>) -> bool {
        self.entries.iter().any(|entry| same_listener(entry, listener))
    }

    /// Clones the handles in notification order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ListenerRef<T, E>> {
        self.entries.clone()
    }

    /// Empties the set and returns its former entries in notification order.
    pub fn take(&mut self) -> Vec<ListenerRef<T, E>> {
        std::mem::take(&mut self.entries)
    }

    /// True if there are no listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries (duplicates counted separately).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T, E> Default for ListenerSet<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for ListenerSet<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.entries.len())
            .finish()
    }
}

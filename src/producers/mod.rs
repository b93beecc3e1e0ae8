//! Stream producers.
//!
//! This module groups the upstream side of a stream: the [`Producer`]
//! contract and two ready-made sources.
//!
//! ## Contents
//! - [`Producer`], [`ProducerRef`] start/stop contract and shared handle
//! - [`FromIter`] finite sequence, completes after the last item
//! - [`Periodic`]  Tokio interval counter, cancelled on stop

mod from_iter;
mod periodic;
mod producer;

pub use from_iter::FromIter;
pub use periodic::Periodic;
pub use producer::{Producer, ProducerRef};

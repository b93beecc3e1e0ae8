use std::borrow::Cow;
use std::sync::Arc;

use super::{config::StreamConfig, stream::Stream};
use crate::error::StreamError;
use crate::listeners::ListenerRef;
use crate::producers::{Producer, ProducerRef};

/// Builder for constructing a [`Stream`] with optional parts.
pub struct StreamBuilder<T, E = StreamError> {
    cfg: StreamConfig,
    producer: Option<ProducerRef<T, E>>,
    target: Option<Stream<T, E>>,
    debug: Option<ListenerRef<T, E>>,
}

impl<T, E> StreamBuilder<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a builder with the default configuration and no parts.
    pub fn new() -> Self {
        Self {
            cfg: StreamConfig::default(),
            producer: None,
            target: None,
            debug: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: StreamConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the stream name used in logs.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Sets [`StreamConfig::forward_errors`].
    pub fn forward_errors(mut self, forward: bool) -> Self {
        self.cfg.forward_errors = forward;
        self
    }

    /// Binds a producer.
    pub fn producer(mut self, producer: impl Producer<T, E>) -> Self {
        self.producer = Some(Arc::new(producer));
        self
    }

    /// Binds an already shared producer.
    pub fn producer_ref(mut self, producer: ProducerRef<T, E>) -> Self {
        self.producer = Some(producer);
        self
    }

    /// Makes the stream forward registrations to `target`.
    ///
    /// A freshly built stream cannot be part of `target`'s chain, so no cycle
    /// check is needed here (unlike [`Stream::imitate`]).
    pub fn imitate(mut self, target: &Stream<T, E>) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// Attaches a debug listener.
    pub fn debug(mut self, listener: ListenerRef<T, E>) -> Self {
        self.debug = Some(listener);
        self
    }

    /// Builds the stream.
    pub fn build(self) -> Stream<T, E> {
        Stream::from_parts(self.cfg, self.producer, self.target, self.debug)
    }
}

impl<T, E> Default for StreamBuilder<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StreamState;
    use crate::listeners::PartialListener;
    use std::sync::Mutex;

    #[test]
    fn test_builder_applies_settings() {
        let s: Stream<u8> = StreamBuilder::new()
            .name("sensor")
            .forward_errors(true)
            .build();

        assert_eq!(s.name(), "sensor");
        assert!(s.config().forward_errors);
        assert!(!s.has_producer());
        assert_eq!(s.state(), StreamState::Idle);
    }

    #[test]
    fn test_builder_wires_debug_and_target() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debug: ListenerRef<u8> = PartialListener::new()
            .on_next(move |v: &u8| sink.lock().unwrap().push(*v))
            .into_ref();

        let target: Stream<u8> = Stream::relay();
        let proxy: Stream<u8> = Stream::builder().imitate(&target).debug(debug).build();
        assert!(proxy.is_imitating());

        proxy.add_partial(PartialListener::new());
        assert_eq!(target.listener_count(), 1);

        proxy.next(&5);
        assert_eq!(*seen.lock().unwrap(), vec![5]);
    }
}

//! Finite producer replaying a fixed sequence on every start.

use std::sync::Arc;

use crate::core::Stream;
use crate::listeners::ListenerRef;
use crate::producers::Producer;

/// Emits each item in order, then completes the sink.
///
/// Emission happens synchronously inside `start`, so the first listener sees
/// every item followed by `complete`. Because completion tears the stream
/// down, each later first listener triggers a fresh replay.
#[derive(Debug, Clone)]
pub struct FromIter<T> {
    items: Vec<T>,
}

impl<T> FromIter<T> {
    /// Creates a producer over `items`.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl<T, E> Producer<T, E> for FromIter<T>
where
    T: Send + Sync + 'static,
    E: 'static,
{
    fn start(&self, sink: ListenerRef<T, E>) {
        for item in &self.items {
            sink.next(item);
        }
        sink.complete();
    }

    fn stop(&self) {}
}

impl<T, E> Stream<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a stream that emits `items` then completes, once per activation.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Stream::new(Arc::new(FromIter::new(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::PartialListener;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>) -> ListenerRef<char> {
        let (a, b) = (Arc::clone(log), Arc::clone(log));
        PartialListener::new()
            .on_next(move |c: &char| a.lock().unwrap().push(c.to_string()))
            .on_complete(move || b.lock().unwrap().push("|".into()))
            .into_ref()
    }

    #[test]
    fn test_emits_items_then_completes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stream: Stream<char> = Stream::from_items(['a', 'b', 'c']);

        stream.add_listener(recorder(&log));

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "|"]);
        assert_eq!(stream.listener_count(), 0);
    }

    #[test]
    fn test_replays_for_next_activation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stream: Stream<char> = Stream::from_items(['x']);

        stream.add_listener(recorder(&log));
        stream.add_listener(recorder(&log));

        assert_eq!(*log.lock().unwrap(), vec!["x", "|", "x", "|"]);
    }
}

//! End-to-end producer lifecycle scenarios through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use relaystream::{
    ListenerRef, PartialListener, Producer, ProducerRef, Stream, StreamError, StreamState,
};
use tokio::sync::Notify;

/// Producer that records every call and the sink it was started with.
#[derive(Default)]
struct Recorder {
    starts: AtomicUsize,
    stops: AtomicUsize,
    sink: Mutex<Option<ListenerRef<i32>>>,
}

impl Recorder {
    fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn has_sink(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    fn emit(&self, v: i32) {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.next(&v);
        }
    }
}

impl Producer<i32> for Recorder {
    fn start(&self, sink: ListenerRef<i32>) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.sink.lock().unwrap().take();
    }
}

/// Producer whose `stop` announces itself, then blocks before releasing the sink.
#[derive(Default)]
struct SlowStop {
    recorder: Recorder,
    stopping: Notify,
}

impl Producer<i32> for SlowStop {
    fn start(&self, sink: ListenerRef<i32>) {
        self.recorder.start(sink);
    }

    fn stop(&self) {
        self.stopping.notify_one();
        std::thread::sleep(Duration::from_millis(100));
        self.recorder.stop();
    }
}

type Log = Arc<Mutex<Vec<(&'static str, i32)>>>;

fn listener(tag: &'static str, log: &Log) -> ListenerRef<i32> {
    let log = Arc::clone(log);
    PartialListener::new()
        .on_next(move |v: &i32| log.lock().unwrap().push((tag, *v)))
        .into_ref()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_listeners_then_both_leave() {
    let log = Log::default();
    let p = Arc::new(Recorder::default());
    let s: Stream<i32> = Stream::new(p.clone());

    let l1 = listener("L1", &log);
    let l2 = listener("L2", &log);

    s.add_listener(Arc::clone(&l1));
    assert_eq!(p.starts(), 1);
    p.emit(5);
    assert_eq!(*log.lock().unwrap(), vec![("L1", 5)]);

    s.add_listener(Arc::clone(&l2));
    assert_eq!(p.starts(), 1);
    s.next(&6);
    assert_eq!(
        *log.lock().unwrap(),
        vec![("L1", 5), ("L1", 6), ("L2", 6)]
    );

    s.remove_listener(&l1);
    assert_eq!(s.state(), StreamState::Active);

    s.remove_listener(&l2);
    assert_eq!(s.state(), StreamState::PendingStop);
    assert_eq!(p.stops(), 0);

    settle().await;
    assert_eq!(p.stops(), 1);
    assert_eq!(s.state(), StreamState::Idle);

    settle().await;
    assert_eq!(p.stops(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_third_listener_arrives_before_the_tick() {
    let log = Log::default();
    let p = Arc::new(Recorder::default());
    let s: Stream<i32> = Stream::new(p.clone());

    let l1 = listener("L1", &log);
    let l2 = listener("L2", &log);
    s.add_listener(Arc::clone(&l1));
    s.add_listener(Arc::clone(&l2));
    s.remove_listener(&l1);
    s.remove_listener(&l2);

    s.add_listener(listener("L3", &log));
    settle().await;

    assert_eq!(p.starts(), 1);
    assert_eq!(p.stops(), 0);
    assert_eq!(s.state(), StreamState::Active);

    p.emit(7);
    assert_eq!(*log.lock().unwrap(), vec![("L3", 7)]);
}

#[tokio::test(start_paused = true)]
async fn test_error_after_pending_stop_does_not_double_stop() {
    let log = Log::default();
    let p = Arc::new(Recorder::default());
    let s: Stream<i32> = Stream::new(p.clone());

    let l1 = listener("L1", &log);
    s.add_listener(Arc::clone(&l1));
    s.remove_listener(&l1);
    s.error(&StreamError::upstream("gone"));
    assert_eq!(p.stops(), 1);

    settle().await;
    assert_eq!(p.stops(), 1);
    assert_eq!(s.state(), StreamState::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_deferred_stop_on_multi_thread_runtime() {
    let log = Log::default();
    let p = Arc::new(Recorder::default());
    let s: Stream<i32> = Stream::new(p.clone());

    let l1 = listener("L1", &log);
    s.add_listener(Arc::clone(&l1));
    s.remove_listener(&l1);

    wait_until(|| p.stops() == 1).await;
    assert_eq!(p.stops(), 1);
    assert_eq!(s.state(), StreamState::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_listener_added_while_deferred_stop_runs_restarts_producer() {
    let log = Log::default();
    let p = Arc::new(SlowStop::default());
    let shared: ProducerRef<i32> = p.clone();
    let s: Stream<i32> = Stream::new(shared);

    let l1 = listener("L1", &log);
    s.add_listener(Arc::clone(&l1));
    s.remove_listener(&l1);

    p.stopping.notified().await;
    s.add_listener(listener("L2", &log));

    wait_until(|| p.recorder.starts() == 2).await;
    assert_eq!(p.recorder.starts(), 2);
    assert_eq!(p.recorder.stops(), 1);
    assert!(p.recorder.has_sink());
    assert_eq!(s.state(), StreamState::Active);

    p.recorder.emit(4);
    assert_eq!(*log.lock().unwrap(), vec![("L2", 4)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_listener_added_while_teardown_stops_restarts_producer() {
    let log = Log::default();
    let p = Arc::new(SlowStop::default());
    let shared: ProducerRef<i32> = p.clone();
    let s: Stream<i32> = Stream::new(shared);

    s.add_listener(listener("L1", &log));
    let closing = s.clone();
    let done = tokio::task::spawn_blocking(move || closing.complete());

    p.stopping.notified().await;
    s.add_listener(listener("L2", &log));
    done.await.unwrap();

    assert_eq!(p.recorder.starts(), 2);
    assert_eq!(p.recorder.stops(), 1);
    assert!(p.recorder.has_sink());
    assert_eq!(s.state(), StreamState::Active);
    assert_eq!(s.listener_count(), 1);
}

#[test]
fn test_complete_reaches_every_listener_once() {
    let completions = Arc::new(AtomicUsize::new(0));
    let p = Arc::new(Recorder::default());
    let s: Stream<i32> = Stream::new(p.clone());

    for _ in 0..3 {
        let c = Arc::clone(&completions);
        s.add_partial(PartialListener::new().on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
    }
    s.complete();

    assert_eq!(completions.load(Ordering::SeqCst), 3);
    assert_eq!(p.stops(), 1);
    assert_eq!(s.listener_count(), 0);
}

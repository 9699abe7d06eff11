use std::sync::mpsc;
use std::time::Duration;

use super::{Event, Notifier};
use crate::playback::PlaybackState;

#[test]
fn subscriber_receives_emitted_events() {
    let notifier = Notifier::new();
    let (tx, rx) = mpsc::channel();
    notifier.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    notifier.emit(Event::CatalogChanged);
    notifier.emit(Event::PlaybackStateChanged {
        old: PlaybackState::Loaded,
        new: PlaybackState::Playing,
    });

    assert!(matches!(
        rx.recv_timeout(Duration::from_secs(1)).unwrap(),
        Event::CatalogChanged
    ));
    assert!(matches!(
        rx.recv_timeout(Duration::from_secs(1)).unwrap(),
        Event::PlaybackStateChanged {
            old: PlaybackState::Loaded,
            new: PlaybackState::Playing,
        }
    ));
}

#[test]
fn all_subscribers_see_every_event() {
    let notifier = Notifier::new();
    let (tx1, rx1) = mpsc::channel();
    let (tx2, rx2) = mpsc::channel();
    notifier.subscribe(move |event| {
        let _ = tx1.send(event.clone());
    });
    notifier.subscribe(move |event| {
        let _ = tx2.send(event.clone());
    });

    notifier.emit(Event::CatalogChanged);

    assert!(rx1.recv_timeout(Duration::from_secs(1)).is_ok());
    assert!(rx2.recv_timeout(Duration::from_secs(1)).is_ok());
}

#[test]
fn emit_does_not_block_on_a_slow_subscriber() {
    let notifier = Notifier::new();
    notifier.subscribe(|_| {
        std::thread::sleep(Duration::from_millis(200));
    });

    let start = std::time::Instant::now();
    for _ in 0..10 {
        notifier.emit(Event::CatalogChanged);
    }
    // Delivery happens on the dispatch thread; emitting is a channel send.
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[test]
fn drop_joins_the_dispatch_thread() {
    let (tx, rx) = mpsc::channel();
    {
        let notifier = Notifier::new();
        notifier.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        notifier.emit(Event::CatalogChanged);
    }
    // The queued event was delivered before the notifier finished dropping.
    assert!(rx.try_recv().is_ok());
}

//! The main queue across threads: posting, waiting, consumers, teardown.

use ircbus_event::event_kinds;
use ircbus_runtime::{EventManager, EventPtr, Irc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

event_kinds! {
    enum Kind {
        Tick,
    }
}

#[test]
fn wait_returns_posted_event() {
    let irc = Irc::new();
    let manager = irc.event_manager();
    let event = irc.make_event(Kind::Tick).unwrap();

    manager.post(event.clone());
    let received = manager.wait().unwrap();
    assert!(Arc::ptr_eq(&received, &event));
}

#[test]
fn events_from_one_thread_arrive_in_fifo_order() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let events: Vec<EventPtr> = (0..8).map(|_| irc.make_event(Kind::Tick).unwrap()).collect();
    let producer = {
        let manager = manager.clone();
        let events = events.clone();
        std::thread::spawn(move || {
            for event in events {
                manager.post(event);
            }
        })
    };

    for expected in &events {
        let received = manager.wait().unwrap();
        assert!(Arc::ptr_eq(&received, expected));
    }
    producer.join().unwrap();
}

#[test]
fn wait_blocks_until_a_post_from_another_thread() {
    let irc = Irc::new();
    let manager = irc.event_manager();
    let event = irc.make_event(Kind::Tick).unwrap();

    let producer = {
        let manager = manager.clone();
        let event = event.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            manager.post(event);
        })
    };

    let received = manager.wait().unwrap();
    assert!(Arc::ptr_eq(&received, &event));
    producer.join().unwrap();
}

#[test]
fn wait_timeout_zero_never_blocks() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    assert!(manager.wait_timeout(Duration::ZERO).is_none());

    let event = irc.make_event(Kind::Tick).unwrap();
    manager.post(event.clone());
    let received = manager.wait_timeout(Duration::ZERO).unwrap();
    assert!(Arc::ptr_eq(&received, &event));
}

#[test]
fn wait_timeout_expires_without_events() {
    let irc = Irc::new();
    let manager = irc.event_manager();
    assert!(manager.wait_timeout(Duration::from_millis(20)).is_none());
}

#[test]
fn accepting_consumer_takes_the_event() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let delivered: Arc<Mutex<Option<EventPtr>>> = Arc::default();
    {
        let delivered = delivered.clone();
        manager.wait_register(Box::new(move |event| {
            *delivered.lock() = event;
            true
        }));
    }

    let event = irc.make_event(Kind::Tick).unwrap();
    manager.post(event.clone());

    let delivered = delivered.lock().take().unwrap();
    assert!(Arc::ptr_eq(&delivered, &event));
    // the consumer accepted, so the queue is empty
    assert!(manager.wait_timeout(Duration::ZERO).is_none());
}

#[test]
fn declining_consumer_leaves_the_event_queued() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let offers = Arc::new(AtomicUsize::new(0));
    {
        let offers = offers.clone();
        manager.wait_register(Box::new(move |_event| {
            offers.fetch_add(1, Ordering::SeqCst);
            false
        }));
    }

    let event = irc.make_event(Kind::Tick).unwrap();
    manager.post(event.clone());

    assert_eq!(offers.load(Ordering::SeqCst), 1);
    let received = manager.wait_timeout(Duration::ZERO).unwrap();
    assert!(Arc::ptr_eq(&received, &event));
}

#[test]
fn consumers_are_one_shot() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let offers = Arc::new(AtomicUsize::new(0));
    {
        let offers = offers.clone();
        manager.wait_register(Box::new(move |_event| {
            offers.fetch_add(1, Ordering::SeqCst);
            false
        }));
    }

    manager.post(irc.make_event(Kind::Tick).unwrap());
    manager.post(irc.make_event(Kind::Tick).unwrap());

    // declined once, never asked again
    assert_eq!(offers.load(Ordering::SeqCst), 1);
}

#[test]
fn consumer_registered_with_nonempty_queue_is_offered_immediately() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let event = irc.make_event(Kind::Tick).unwrap();
    manager.post(event.clone());

    let offers = Arc::new(AtomicUsize::new(0));
    {
        let offers = offers.clone();
        manager.wait_register(Box::new(move |_event| {
            offers.fetch_add(1, Ordering::SeqCst);
            false
        }));
    }
    assert_eq!(offers.load(Ordering::SeqCst), 1);

    // declined at registration time means spent; a later post is not offered
    manager.post(irc.make_event(Kind::Tick).unwrap());
    assert_eq!(offers.load(Ordering::SeqCst), 1);
}

#[test]
fn several_consumers_are_tried_in_turn() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let taker: Arc<Mutex<Option<EventPtr>>> = Arc::default();
    manager.wait_register(Box::new(|_event| false));
    {
        let taker = taker.clone();
        manager.wait_register(Box::new(move |event| {
            *taker.lock() = event;
            true
        }));
    }

    let event = irc.make_event(Kind::Tick).unwrap();
    manager.post(event.clone());

    let taken = taker.lock().take().unwrap();
    assert!(Arc::ptr_eq(&taken, &event));
    assert!(manager.wait_timeout(Duration::ZERO).is_none());
}

#[test]
fn teardown_wakes_blocked_waiters_with_none() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let waiter = {
        let manager = manager.clone();
        std::thread::spawn(move || manager.wait())
    };

    // give the waiter a moment to block, then tear the context down
    std::thread::sleep(Duration::from_millis(30));
    drop(irc);

    assert!(waiter.join().unwrap().is_none());
}

#[test]
fn teardown_feeds_none_to_pending_consumers() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let saw: Arc<Mutex<Option<Option<()>>>> = Arc::default();
    {
        let saw = saw.clone();
        manager.wait_register(Box::new(move |event| {
            *saw.lock() = Some(event.map(|_| ()));
            false
        }));
    }

    drop(irc);

    // invoked exactly once, with no event
    assert_eq!(*saw.lock(), Some(None));
}

#[test]
fn consumer_registered_after_shutdown_gets_none_immediately() {
    let irc = Irc::new();
    let manager = irc.event_manager();
    drop(irc);

    let saw: Arc<Mutex<Option<Option<()>>>> = Arc::default();
    {
        let saw = saw.clone();
        manager.wait_register(Box::new(move |event| {
            *saw.lock() = Some(event.map(|_| ()));
            false
        }));
    }
    assert_eq!(*saw.lock(), Some(None));
}

#[test]
fn post_after_shutdown_is_dropped() {
    let irc = Irc::new();
    let manager = irc.event_manager();
    let event = irc.make_event(Kind::Tick).unwrap();
    drop(irc);

    manager.post(event);
    assert!(manager.wait().is_none());
    assert!(manager.wait_timeout(Duration::ZERO).is_none());
}

#[test]
fn posting_from_many_threads_loses_nothing() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    const THREADS: usize = 4;
    const PER_THREAD: usize = 25;

    let producers: Vec<_> = (0..THREADS)
        .map(|_| {
            let manager = manager.clone();
            let irc = irc.clone();
            std::thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    manager.post(irc.make_event(Kind::Tick).unwrap());
                }
            })
        })
        .collect();

    let mut received = 0;
    while received < THREADS * PER_THREAD {
        assert!(manager.wait_timeout(Duration::from_secs(5)).is_some());
        received += 1;
    }
    assert!(manager.wait_timeout(Duration::ZERO).is_none());

    for producer in producers {
        producer.join().unwrap();
    }
}

//! The nested dispatch loop, handler ordering, and follow-up scheduling.

use ircbus_event::{event_kinds, EventId, QueuePosition, QueueStrategy};
use ircbus_runtime::{DispatchEvent, EventManager, Irc, Priority, RuntimeError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

event_kinds! {
    enum Kind {
        X,
        Y,
        Z,
    }
}

type Log = Arc<Mutex<Vec<&'static str>>>;

/// Connects a handler that appends `name` whenever the chain for `id` runs.
fn record(irc: &Irc, id: impl Into<EventId>, log: &Log, name: &'static str) {
    let log = log.clone();
    irc.event_manager().connect_fn(
        id,
        move |_event| {
            log.lock().push(name);
            Ok(())
        },
        Priority::NORMAL,
    );
}

#[test]
fn handler_priority_ordering() {
    let irc = Irc::new();
    let log: Log = Arc::default();
    let manager = irc.event_manager();

    let push = |name: &'static str, log: &Log| {
        let log = log.clone();
        move |_event: &ircbus_runtime::EventPtr| {
            log.lock().push(name);
            Ok(())
        }
    };

    manager.connect_fn(Kind::X, push("h1", &log), Priority::NORMAL);
    manager.connect_fn(Kind::X, push("h2", &log), Priority::HIGH);
    manager.connect_fn(Kind::X, push("h3", &log), Priority::FIRST);
    manager.connect_fn(Kind::X, push("h4", &log), Priority::FIRST);

    let event = irc.make_event(Kind::X).unwrap();
    event.handle_as(Kind::X).unwrap();

    // FIRST is last come, first serve; everything else is ascending
    // priority with FIFO ties
    assert_eq!(*log.lock(), ["h4", "h3", "h2", "h1"]);
}

#[test]
fn plain_handle_dispatches_origin_and_reserved_ids_only() {
    let irc = Irc::new();
    let log: Log = Arc::default();

    record(&irc, DispatchEvent::BeginHandling, &log, "begin");
    record(&irc, Kind::X, &log, "x");
    record(&irc, DispatchEvent::FinishingHandling, &log, "finishing");
    record(&irc, DispatchEvent::FinishedHandling, &log, "finished");

    let event = irc.make_event(Kind::X).unwrap();
    event.handle().unwrap();

    assert_eq!(*log.lock(), ["begin", "x", "finishing", "finished"]);
    assert_eq!(event.pop_next(), EventId::invalid());
}

#[test]
fn nested_dispatch_with_finishing_requeue() {
    let irc = Irc::new();
    let log: Log = Arc::default();

    record(&irc, DispatchEvent::BeginHandling, &log, "begin");
    record(&irc, Kind::Y, &log, "y");
    record(&irc, Kind::Z, &log, "z");
    record(&irc, DispatchEvent::FinishedHandling, &log, "finished");

    // the X handler queues Y behind it
    {
        let log = log.clone();
        irc.event_manager().connect_fn(
            Kind::X,
            move |event| {
                log.lock().push("x");
                event.queue_as(Kind::Y, QueueStrategy::Duplicate, QueuePosition::Back);
                Ok(())
            },
            Priority::NORMAL,
        );
    }

    // the finishing pass queues Z, but only the first time around
    {
        let log = log.clone();
        let fired = AtomicBool::new(false);
        irc.event_manager().connect_fn(
            DispatchEvent::FinishingHandling,
            move |event| {
                log.lock().push("finishing");
                if !fired.swap(true, Ordering::SeqCst) {
                    event.queue_as(Kind::Z, QueueStrategy::Duplicate, QueuePosition::Back);
                }
                Ok(())
            },
            Priority::NORMAL,
        );
    }

    let event = irc.make_event(Kind::X).unwrap();
    event.handle().unwrap();

    assert_eq!(
        *log.lock(),
        ["begin", "x", "y", "finishing", "z", "finishing", "finished"]
    );
}

#[test]
fn ids_queued_during_finished_handling_stay_queued() {
    let irc = Irc::new();
    let log: Log = Arc::default();

    record(&irc, Kind::Y, &log, "y");
    irc.event_manager().connect_fn(
        DispatchEvent::FinishedHandling,
        |event| {
            event.queue_as(Kind::Y, QueueStrategy::Duplicate, QueuePosition::Back);
            Ok(())
        },
        Priority::NORMAL,
    );

    let event = irc.make_event(Kind::X).unwrap();
    event.handle().unwrap();

    // Y was not dispatched by this call, but remains queued
    assert!(log.lock().is_empty());
    assert!(event.is_queued_as(Kind::Y));
}

#[test]
fn afterwards_events_jump_the_queue() {
    let irc = Irc::new();
    let manager = irc.event_manager();

    let e1 = irc.make_event(Kind::X).unwrap();
    let e2 = irc.make_event(Kind::X).unwrap();
    let f1 = irc.make_event(Kind::Y).unwrap();
    let f2 = irc.make_event(Kind::Y).unwrap();

    // only e1 schedules follow-ups
    {
        let trigger = e1.uid();
        let f1 = f1.clone();
        let f2 = f2.clone();
        manager.connect_fn(
            Kind::X,
            move |event| {
                if event.uid() == trigger {
                    event.afterwards(f1.clone())?;
                    event.afterwards(f2.clone())?;
                }
                Ok(())
            },
            Priority::NORMAL,
        );
    }

    manager.post(e1.clone());
    manager.post(e2.clone());

    let first = manager.wait().unwrap();
    assert!(Arc::ptr_eq(&first, &e1));
    first.handle().unwrap();

    // f1 and f2 now sit in front of e2, in scheduling order
    let order: Vec<_> = std::iter::from_fn(|| manager.wait_timeout(std::time::Duration::ZERO))
        .collect();
    assert_eq!(order.len(), 3);
    assert!(Arc::ptr_eq(&order[0], &f1));
    assert!(Arc::ptr_eq(&order[1], &f2));
    assert!(Arc::ptr_eq(&order[2], &e2));
}

#[test]
fn failing_handler_aborts_the_chain_and_propagates() {
    let irc = Irc::new();
    let log: Log = Arc::default();

    irc.event_manager().connect_fn(
        Kind::X,
        |_event| Err(RuntimeError::handler("boom")),
        Priority::HIGH,
    );
    record(&irc, Kind::X, &log, "late");

    let event = irc.make_event(Kind::X).unwrap();
    let err = event.handle_as(Kind::X).unwrap_err();

    assert_eq!(err, RuntimeError::HandlerFailed("boom".into()));
    // the later handler of the chain never ran
    assert!(log.lock().is_empty());
    // current_id was restored despite the failure
    assert_eq!(event.current_id(), event.origin_id());
}

#[test]
fn failing_handler_leaves_queued_ids_in_place() {
    let irc = Irc::new();

    irc.event_manager().connect_fn(
        Kind::X,
        |event| {
            event.queue_as(Kind::Y, QueueStrategy::Duplicate, QueuePosition::Back);
            Err(RuntimeError::handler("boom"))
        },
        Priority::NORMAL,
    );

    let event = irc.make_event(Kind::X).unwrap();
    assert!(event.handle().is_err());

    // no rollback: what the handler queued is still there
    assert!(event.is_queued_as(Kind::Y));
}

#[test]
fn nested_handle_as_restores_current_id() {
    let irc = Irc::new();
    let observed: Arc<Mutex<Vec<EventId>>> = Arc::default();

    {
        let observed = observed.clone();
        irc.event_manager().connect_fn(
            Kind::Y,
            move |event| {
                observed.lock().push(event.current_id());
                Ok(())
            },
            Priority::NORMAL,
        );
    }
    {
        let observed = observed.clone();
        irc.event_manager().connect_fn(
            Kind::X,
            move |event| {
                observed.lock().push(event.current_id());
                event.handle_as(Kind::Y)?;
                observed.lock().push(event.current_id());
                Ok(())
            },
            Priority::NORMAL,
        );
    }

    let event = irc.make_event(Kind::X).unwrap();
    event.handle_as(Kind::X).unwrap();

    assert_eq!(
        *observed.lock(),
        [EventId::of(Kind::X), EventId::of(Kind::Y), EventId::of(Kind::X)]
    );
}

#[test]
fn handlers_may_connect_while_dispatching() {
    let irc = Irc::new();
    let log: Log = Arc::default();

    {
        let log = log.clone();
        let irc_handle = irc.clone();
        irc.event_manager().connect_fn(
            Kind::X,
            move |_event| {
                // connecting re-enters the registry from inside a handler
                record(&irc_handle, Kind::Y, &log, "y");
                Ok(())
            },
            Priority::NORMAL,
        );
    }

    let event = irc.make_event(Kind::X).unwrap();
    event.handle_as(Kind::X).unwrap();
    event.handle_as(Kind::Y).unwrap();

    assert_eq!(*log.lock(), ["y"]);
}

#[test]
fn disconnect_stops_future_dispatch() {
    let irc = Irc::new();
    let log: Log = Arc::default();

    let connection = {
        let log = log.clone();
        irc.event_manager().connect_fn(
            Kind::X,
            move |_event| {
                log.lock().push("x");
                Ok(())
            },
            Priority::NORMAL,
        )
    };

    let event = irc.make_event(Kind::X).unwrap();
    event.handle_as(Kind::X).unwrap();

    assert!(connection.is_connected());
    assert!(connection.disconnect());
    assert!(!connection.disconnect());

    event.handle_as(Kind::X).unwrap();
    assert_eq!(*log.lock(), ["x"]);
}

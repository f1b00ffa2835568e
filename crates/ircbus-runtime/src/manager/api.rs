//! The event manager API.
//!
//! An event manager is the module that owns dispatch: the main event
//! queue, the per-identity handler chains, and the nested dispatch loop
//! that drives one event through its identity queue. The IRC context
//! installs [`StandardEventManager`](super::StandardEventManager) by
//! default; alternative implementations provide this trait and occupy the
//! same module slot.

use crate::error::RuntimeError;
use crate::event::EventPtr;
use crate::manager::{Connection, Priority};
use ircbus_event::{event_kinds, EventId};
use ircbus_component::Component;
use std::time::Duration;

/// An event handler: called with a shared reference to the event being
/// dispatched.
///
/// Handlers run synchronously on the consumer thread. A handler may mutate
/// the event (attach components, queue further identities, schedule
/// follow-up events) before returning. Returning an error aborts the
/// current handler chain and propagates to whoever started the dispatch.
pub type Handler = Box<dyn Fn(&EventPtr) -> Result<(), RuntimeError> + Send + Sync>;

/// A one-shot event consumer registered through
/// [`EventManager::wait_register`].
///
/// Called exactly once: with `Some(event)` when an event becomes
/// available (return `true` to accept and consume it, `false` to decline
/// and leave it for other consumers and waiters), or with `None` when the
/// manager is torn down before an event arrives.
///
/// Consumers are invoked while the manager's queue lock is held; they must
/// not call back into the manager.
pub type Consumer = Box<dyn FnOnce(Option<EventPtr>) -> bool + Send>;

event_kinds! {
    /// Event ids raised by the dispatch loop itself around every handled
    /// event. Registered by the core; modules connect to these to observe
    /// or extend event handling.
    pub enum DispatchEvent {
        /// Dispatched right before handling of an event begins.
        BeginHandling,

        /// Dispatched right before handling finishes.
        ///
        /// If handlers queue further ids during this chain, those are
        /// handled and another `FinishingHandling` pass follows.
        FinishingHandling,

        /// Dispatched after handling finished. Ids queued during this
        /// chain stay in the queue and are not handled by this call;
        /// this chain is the last chance to schedule follow-up events
        /// via `afterwards`.
        FinishedHandling,
    }
}

/// Follow-up events scheduled to run right after the current event.
///
/// Attached to an event by [`Event::afterwards`](crate::Event::afterwards);
/// consumed (and removed) by the event manager when the dispatch loop
/// completes, prepending the collected events to the main queue.
#[derive(Debug, Default)]
pub struct HandleAfterwards {
    /// The follow-up events, in scheduling order.
    pub events: Vec<EventPtr>,
}

impl Component for HandleAfterwards {
    type Base = HandleAfterwards;
}

/// The main event manager interface.
///
/// # Thread safety
///
/// Every method is safe to call from any thread once the manager is fully
/// constructed. [`wait`](Self::wait) and [`wait_timeout`](Self::wait_timeout)
/// are the only blocking operations. [`handle`](Self::handle) is intended
/// for the consumer thread; handlers run synchronously on the calling
/// thread.
pub trait EventManager: Send + Sync {
    /// Connects an event handler to an event id.
    ///
    /// Returns the connection token that disconnects the handler. Safe to
    /// call from inside a running handler.
    fn connect(&self, id: EventId, handler: Handler, priority: Priority) -> Connection;

    /// Appends an event to the main queue and wakes waiters.
    ///
    /// Never blocks on user handlers. After
    /// [`shutdown`](Self::shutdown) the event is dropped with a warning.
    fn post(&self, event: EventPtr);

    /// Waits until an event is available and removes it from the queue.
    ///
    /// Returns `None` only when the manager is being or has been torn
    /// down.
    fn wait(&self) -> Option<EventPtr>;

    /// Waits for an event with a deadline.
    ///
    /// Returns `None` on timeout or teardown. May also return `None`
    /// early spuriously; a `Some` return always carries a real event.
    /// A zero timeout never blocks.
    fn wait_timeout(&self, timeout: Duration) -> Option<EventPtr>;

    /// Registers a one-shot consumer for the next available event.
    ///
    /// The order in which pending consumers and blocked `wait` calls are
    /// satisfied is unspecified, but every consumer is eventually invoked
    /// exactly once, with `None` if the manager is torn down first.
    fn wait_register(&self, consumer: Consumer);

    /// Runs the full nested dispatch loop for an event.
    ///
    /// 1. dispatches [`DispatchEvent::BeginHandling`]
    /// 2. drains the event's identity queue, dispatching each id
    /// 3. dispatches [`DispatchEvent::FinishingHandling`]; if that queued
    ///    new ids, returns to step 2
    /// 4. dispatches [`DispatchEvent::FinishedHandling`] (ids queued here
    ///    stay queued)
    /// 5. prepends the event's scheduled follow-up events to the main
    ///    queue, preserving their order
    ///
    /// Prefer `event.handle()` over invoking this directly.
    ///
    /// # Errors
    ///
    /// The first handler failure aborts the loop and propagates; the
    /// event's remaining queued ids are left in place.
    fn handle(&self, event: &EventPtr) -> Result<(), RuntimeError>;

    /// Dispatches exactly one handler chain, for the event's current id.
    ///
    /// Prefer `event.handle_as(id)` over invoking this directly.
    ///
    /// # Errors
    ///
    /// The first handler failure aborts the chain and propagates.
    fn handle_as(&self, event: &EventPtr) -> Result<(), RuntimeError>;

    /// Tears the manager down.
    ///
    /// Wakes every blocked waiter with `None`, invokes every pending
    /// consumer with `None`, and drops all queued events. Idempotent;
    /// also runs on drop and on context teardown.
    fn shutdown(&self);
}

impl dyn EventManager {
    /// [`connect`](EventManager::connect) with the boxing and id
    /// conversion done for you.
    ///
    /// ```no_run
    /// use ircbus_event::event_kinds;
    /// use ircbus_runtime::{Irc, Priority};
    ///
    /// event_kinds! {
    ///     enum Kind { Ping }
    /// }
    ///
    /// let irc = Irc::new();
    /// let connection = irc.event_manager().connect_fn(
    ///     Kind::Ping,
    ///     |_event| Ok(()),
    ///     Priority::NORMAL,
    /// );
    /// # drop(connection);
    /// ```
    pub fn connect_fn<I, F>(&self, id: I, handler: F, priority: Priority) -> Connection
    where
        I: Into<EventId>,
        F: Fn(&EventPtr) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.connect(id.into(), Box::new(handler), priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ircbus_event::EventKind;

    #[test]
    fn dispatch_events_are_registered_kinds() {
        let begin = EventId::of(DispatchEvent::BeginHandling);
        assert!(begin.is_valid());
        assert!(begin.is_of::<DispatchEvent>());
        assert_eq!(
            DispatchEvent::from_ordinal(DispatchEvent::FinishedHandling.ordinal()),
            Some(DispatchEvent::FinishedHandling)
        );
    }

    #[test]
    fn dispatch_events_are_distinct() {
        let ids = [
            EventId::of(DispatchEvent::BeginHandling),
            EventId::of(DispatchEvent::FinishingHandling),
            EventId::of(DispatchEvent::FinishedHandling),
        ];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }
}

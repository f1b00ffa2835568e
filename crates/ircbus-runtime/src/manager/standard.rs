//! The default event manager.

use crate::context::Irc;
use crate::error::RuntimeError;
use crate::event::EventPtr;
use crate::manager::api::{Consumer, DispatchEvent, EventManager, Handler};
use crate::manager::connection::{Connection, Disconnector};
use crate::manager::registry::HandlerRegistry;
use crate::manager::Priority;
use crate::module::{LoadModule, Module};
use ircbus_event::EventId;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Everything the main queue mutex protects.
#[derive(Default)]
struct QueueState {
    queue: VecDeque<EventPtr>,
    /// One-shot consumers. A `None` slot was already invoked; slots are
    /// only compacted when the cursor has passed the whole list.
    consumers: Vec<Option<Consumer>>,
    /// Consumers below this index have had their shot.
    cursor: usize,
    closed: bool,
}

/// The default implementation of the [`EventManager`] interface.
///
/// One mutex guards the main queue, the pending consumer list and its
/// cursor; a condition variable wakes blocked waiters. The handler
/// registry has its own lock, held only while connecting, disconnecting
/// or snapshotting a chain, never while handlers run, so handlers can
/// call back into the manager freely.
///
/// Loaded into every new context automatically; see [`Irc::new`].
pub struct StandardEventManager {
    state: Mutex<QueueState>,
    available: Condvar,
    registry: Arc<HandlerRegistry>,
}

impl StandardEventManager {
    /// Creates a manager with an empty queue and registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
            registry: Arc::new(HandlerRegistry::default()),
        }
    }

    /// Offers queued events to pending consumers.
    ///
    /// Walks the consumer list once: each consumer not yet tried is
    /// invoked with the front event and consumes it by returning `true`.
    /// When the cursor has passed the whole list, the list resets.
    ///
    /// Requires: `state` locked.
    fn offer_to_consumers(state: &mut QueueState) {
        while !state.queue.is_empty() && state.cursor < state.consumers.len() {
            let slot = state.cursor;
            state.cursor += 1;
            let Some(consumer) = state.consumers[slot].take() else {
                continue;
            };
            let Some(front) = state.queue.front().cloned() else {
                break;
            };
            if consumer(Some(front)) {
                state.queue.pop_front();
            }
        }

        if state.cursor > 0 && state.cursor == state.consumers.len() {
            state.consumers.clear();
            state.cursor = 0;
        }
    }
}

impl Default for StandardEventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EventManager for StandardEventManager {
    fn connect(&self, id: EventId, handler: Handler, priority: Priority) -> Connection {
        let token = self.registry.connect(id, handler, priority);
        trace!(id = %id, priority = priority.0, token, "handler connected");
        let registry_dyn: Arc<dyn Disconnector> = self.registry.clone();
        let hub: Weak<dyn Disconnector> = Arc::downgrade(&registry_dyn);
        Connection::new(hub, token)
    }

    fn post(&self, event: EventPtr) {
        let mut state = self.state.lock();
        if state.closed {
            warn!(event = %event.uid(), "event posted after shutdown; dropping");
            return;
        }
        trace!(event = %event.uid(), queued = state.queue.len() + 1, "event posted");
        state.queue.push_back(event);
        Self::offer_to_consumers(&mut state);
        drop(state);
        self.available.notify_all();
    }

    fn wait(&self) -> Option<EventPtr> {
        let mut state = self.state.lock();
        loop {
            if let Some(event) = state.queue.pop_front() {
                return Some(event);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> Option<EventPtr> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(event) = state.queue.pop_front() {
                return Some(event);
            }
            if state.closed {
                return None;
            }
            if self.available.wait_until(&mut state, deadline).timed_out() {
                return None;
            }
        }
    }

    fn wait_register(&self, consumer: Consumer) {
        let mut state = self.state.lock();
        if state.closed {
            drop(state);
            consumer(None);
            return;
        }
        if let Some(front) = state.queue.front().cloned() {
            // the consumer gets its single shot right away
            if consumer(Some(front)) {
                state.queue.pop_front();
            }
            return;
        }
        state.consumers.push(Some(consumer));
    }

    fn handle(&self, event: &EventPtr) -> Result<(), RuntimeError> {
        debug!(event = %event.uid(), origin = %event.origin_id(), "handling event");
        event.handle_as(DispatchEvent::BeginHandling)?;

        let mut next = event.pop_next();
        loop {
            while next.is_valid() {
                event.handle_as(next)?;
                next = event.pop_next();
            }
            event.handle_as(DispatchEvent::FinishingHandling)?;

            // the finishing pass may have queued more ids
            next = event.pop_next();
            if !next.is_valid() {
                break;
            }
        }

        event.handle_as(DispatchEvent::FinishedHandling)?;

        if let Some(followups) = event.take_followups()? {
            trace!(event = %event.uid(), followups = followups.len(), "queueing follow-up events");
            let mut state = self.state.lock();
            for follow in followups.into_iter().rev() {
                state.queue.push_front(follow);
            }
            Self::offer_to_consumers(&mut state);
            drop(state);
            self.available.notify_all();
        }
        Ok(())
    }

    fn handle_as(&self, event: &EventPtr) -> Result<(), RuntimeError> {
        let chain = self.registry.snapshot(event.current_id());
        for handler in chain {
            handler.as_ref()(event)?;
        }
        Ok(())
    }

    fn shutdown(&self) {
        let pending = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.cursor = 0;
            let pending: Vec<Consumer> = state.consumers.drain(..).flatten().collect();
            let dropped = state.queue.len();
            state.queue.clear();
            debug!(
                consumers = pending.len(),
                dropped_events = dropped,
                "event manager shutting down"
            );
            pending
        };
        for consumer in pending {
            consumer(None);
        }
        self.available.notify_all();
    }
}

impl Module for StandardEventManager {
    type Api = dyn EventManager;

    fn as_event_manager(self: Arc<Self>) -> Option<Arc<dyn EventManager>> {
        Some(self)
    }
}

impl LoadModule for StandardEventManager {
    fn load(_irc: &Irc) -> Result<Self, RuntimeError> {
        Ok(Self::new())
    }
}

impl Drop for StandardEventManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

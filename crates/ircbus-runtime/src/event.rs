//! The event object.
//!
//! An event describes anything happening in an IRC context. It is born
//! with an *origin id*, carries its structured payload as components, and
//! travels through handler chains driven by its identity queue: handlers
//! can queue the same event under further ids, and the event manager
//! dispatches one chain per queued id until the queue drains.
//!
//! Events are shared-ownership objects ([`EventPtr`]): the main queue,
//! running handlers and scheduled follow-ups may all hold references while
//! the event is in flight. The event holds its context *weakly*: an
//! event must not outlive its context, and one that does reports
//! [`RuntimeError::ContextDropped`] instead of dispatching.

use crate::context::{Irc, IrcInner};
use crate::error::RuntimeError;
use crate::manager::{EventManager, HandleAfterwards};
use ircbus_component::{ComponentContainer, ComponentError};
use ircbus_event::{EventError, EventId, IdQueue, QueueOutcome, QueuePosition, QueueStrategy};
use ircbus_types::EventUid;
use parking_lot::{Mutex, MutexGuard};
use std::sync::{Arc, Weak};
use tracing::trace;

/// A shared reference to an event.
pub type EventPtr = Arc<Event>;

/// An IRC event.
///
/// Created through [`Irc::make_event`]; never constructed bare, since every
/// event lives inside an [`EventPtr`].
///
/// # Thread model
///
/// Posting and holding references to an event is safe from any thread.
/// *Mutating* an in-flight event (components, identity queue, follow-ups)
/// is meant for handlers running on the consumer thread; the internal
/// locks keep concurrent misuse memory-safe, but no ordering is promised.
pub struct Event {
    uid: EventUid,
    ctx: Weak<IrcInner>,
    weak_self: Weak<Event>,
    origin_id: EventId,
    current_id: Mutex<EventId>,
    components: Mutex<ComponentContainer>,
    queue: Mutex<IdQueue>,
}

impl Event {
    /// Creates an event with the given origin id.
    ///
    /// The identity queue starts out holding the origin id, so a plain
    /// [`handle`](Self::handle) dispatches the event as what it was
    /// created as.
    pub(crate) fn new(ctx: Weak<IrcInner>, origin_id: EventId) -> Result<EventPtr, EventError> {
        if !origin_id.is_valid() {
            return Err(EventError::InvalidId);
        }
        let event = Arc::new_cyclic(|weak_self| {
            let mut queue = IdQueue::new();
            queue.queue(origin_id, QueueStrategy::Duplicate, QueuePosition::Back);
            Event {
                uid: EventUid::new(),
                ctx,
                weak_self: weak_self.clone(),
                origin_id,
                current_id: Mutex::new(origin_id),
                components: Mutex::new(ComponentContainer::new()),
                queue: Mutex::new(queue),
            }
        });
        Ok(event)
    }

    /// The per-instance uid, for log correlation.
    #[must_use]
    pub fn uid(&self) -> EventUid {
        self.uid
    }

    /// The id this event was created as. Immutable and always valid.
    #[must_use]
    pub fn origin_id(&self) -> EventId {
        self.origin_id
    }

    /// The id this event is currently being dispatched as.
    ///
    /// Only meaningful from within a handler, where it names the chain
    /// being run. Outside of handlers the value is unspecified. Note that
    /// state read from other sources (say, a connection module's current
    /// state) reflects the latest write and may already have moved past
    /// what an in-flight event describes; `current_id` only ever reflects
    /// the identity being dispatched right now.
    #[must_use]
    pub fn current_id(&self) -> EventId {
        *self.current_id.lock()
    }

    /// The IRC context this event belongs to, or `None` once the context
    /// has been torn down.
    #[must_use]
    pub fn context(&self) -> Option<Irc> {
        self.ctx.upgrade().map(Irc::from_inner)
    }

    /// The event's component store.
    ///
    /// The returned guard holds the component lock; keep it short-lived
    /// inside handlers.
    pub fn components(&self) -> MutexGuard<'_, ComponentContainer> {
        self.components.lock()
    }

    /// Kicks off handling of the event.
    ///
    /// Runs the full nested dispatch loop on the context's event manager
    /// (see [`EventManager::handle`]). When this returns successfully, the
    /// identity queue is empty.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ContextDropped`] when the context is gone
    /// - the first handler failure, which aborts the loop
    pub fn handle(&self) -> Result<(), RuntimeError> {
        let manager = self.manager()?;
        manager.handle(&self.shared())
    }

    /// Handles the event as one specific id.
    ///
    /// Dispatches exactly the handler chain for `id`; `current_id`
    /// reflects `id` for the duration and is restored afterwards, also
    /// when a handler fails.
    ///
    /// # Errors
    ///
    /// - [`EventError::InvalidId`] when `id` is the invalid sentinel
    /// - [`RuntimeError::ContextDropped`] when the context is gone
    /// - the first handler failure, which aborts the chain
    pub fn handle_as(&self, id: impl Into<EventId>) -> Result<(), RuntimeError> {
        let id = id.into();
        if !id.is_valid() {
            return Err(EventError::InvalidId.into());
        }
        let manager = self.manager()?;
        let this = self.shared();

        let previous = {
            let mut current = self.current_id.lock();
            std::mem::replace(&mut *current, id)
        };
        trace!(event = %self.uid, id = %id, "dispatching handler chain");
        let result = manager.handle_as(&this);
        *self.current_id.lock() = previous;
        result
    }

    /// Queues the event as a further id.
    ///
    /// What happens when an equivalent id is already queued depends on
    /// `strategy`; `position` picks the end of the queue. Queuing the
    /// invalid sentinel reports [`QueueOutcome::Invalid`] and changes
    /// nothing.
    pub fn queue_as(
        &self,
        id: impl Into<EventId>,
        strategy: QueueStrategy,
        position: QueuePosition,
    ) -> QueueOutcome {
        self.queue.lock().queue(id.into(), strategy, position)
    }

    /// Queues the event as several further ids at once.
    ///
    /// Unlike repeated [`queue_as`](Self::queue_as) calls, the strategy is
    /// applied only against the queue as it was when the call started, so
    /// duplicates within `ids` are preserved; front insertion preserves
    /// the order of `ids`. `report` receives the outcome for each element.
    pub fn queue_as_many<I, F>(
        &self,
        ids: I,
        strategy: QueueStrategy,
        position: QueuePosition,
        report: F,
    ) where
        I: IntoIterator<Item = EventId>,
        F: FnMut(EventId, QueueOutcome),
    {
        self.queue.lock().queue_many(ids, strategy, position, report)
    }

    /// Removes all queued ids equal to `id`; returns whether any were
    /// removed.
    pub fn unqueue(&self, id: impl Into<EventId>) -> bool {
        self.queue.lock().unqueue(id.into())
    }

    /// Removes all queued ids matching `matcher`; returns whether any
    /// were removed.
    pub fn unqueue_matching<F>(&self, matcher: F) -> bool
    where
        F: FnMut(EventId) -> bool,
    {
        self.queue.lock().unqueue_matching(matcher)
    }

    /// Whether the event is queued as `id`.
    #[must_use]
    pub fn is_queued_as(&self, id: impl Into<EventId>) -> bool {
        self.queue.lock().contains(id.into())
    }

    /// Whether the event is queued as any id matching `matcher`.
    ///
    /// Returns after the first positive match; a matcher that never
    /// returns `true` sees every queued id, which allows inspection of
    /// the pending queue.
    #[must_use]
    pub fn is_queued_matching<F>(&self, matcher: F) -> bool
    where
        F: FnMut(EventId) -> bool,
    {
        self.queue.lock().contains_matching(matcher)
    }

    /// Pops the next queued id, or the invalid sentinel if the queue is
    /// empty.
    ///
    /// Reserved for event manager implementations driving the dispatch
    /// loop.
    pub fn pop_next(&self) -> EventId {
        self.queue.lock().pop_next()
    }

    /// Schedules `follow` to be handled right after this event.
    ///
    /// Appends to the event's [`HandleAfterwards`] component, creating it
    /// on first use. When this event's dispatch loop completes, the event
    /// manager moves the collected events to the front of the main queue
    /// in scheduling order.
    ///
    /// # Errors
    ///
    /// Fails with [`ComponentError::Conflict`] when the follow-up slot is
    /// occupied by a foreign component.
    pub fn afterwards(&self, follow: EventPtr) -> Result<(), ComponentError> {
        let mut components = self.components.lock();
        components
            .at_or_insert_with(HandleAfterwards::default)?
            .events
            .push(follow);
        Ok(())
    }

    /// Detaches and returns the scheduled follow-up events, if any.
    pub(crate) fn take_followups(&self) -> Result<Option<Vec<EventPtr>>, ComponentError> {
        let mut components = self.components.lock();
        Ok(components
            .take::<HandleAfterwards>()?
            .map(|afterwards| afterwards.events))
    }

    /// The context's event manager.
    fn manager(&self) -> Result<Arc<dyn EventManager>, RuntimeError> {
        match self.context() {
            Some(irc) => Ok(irc.event_manager()),
            None => Err(RuntimeError::ContextDropped),
        }
    }

    /// This event as an [`EventPtr`].
    ///
    /// Events only ever exist inside an `Arc` (see
    /// [`Irc::make_event`]), so the upgrade cannot fail while `&self` is
    /// alive.
    fn shared(&self) -> EventPtr {
        self.weak_self
            .upgrade()
            .expect("events are always owned by an Arc")
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("uid", &self.uid)
            .field("origin_id", &self.origin_id)
            .field("queued", &self.queue.lock().len())
            .finish()
    }
}

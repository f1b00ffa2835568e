//! The per-event identity queue.
//!
//! While an event is being handled it carries an ordered list of identities
//! it is still to be dispatched as. Handlers extend or prune that list
//! through the event's `queue_as` / `unqueue` family; the event manager
//! drains it with `pop_next`.
//!
//! The queue is a plain contiguous buffer with a head cursor: popped
//! entries are not removed physically until the space is needed again.
//! Front insertion reuses that popped prefix when it is large enough;
//! back insertion compacts the buffer first when capacity is tight.

use crate::id::EventId;
use serde::{Deserialize, Serialize};

/// Which end of the queue an identity is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuePosition {
    /// Add to the end of the queue (handled last).
    Back,
    /// Add to the front of the queue (handled next).
    Front,
}

/// What to do when an equivalent identity is already queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStrategy {
    /// Keep the queued identity, drop the new one.
    Discard,
    /// Remove every queued equivalent, then add the new one.
    Replace,
    /// Add the new identity regardless of duplicates.
    Duplicate,
}

/// The outcome of a queuing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueOutcome {
    /// Not inserted: an equivalent identity was already queued.
    Discarded,
    /// Inserted.
    Queued,
    /// Inserted, and at least one previously queued equivalent was removed.
    Replaced,
    /// Not inserted: the identity was the invalid sentinel.
    Invalid,
}

/// Ordered sequence of identities pending re-dispatch for one event.
///
/// Only valid identities are ever stored; requests to queue the invalid
/// sentinel report [`QueueOutcome::Invalid`] and leave the queue untouched.
#[derive(Debug, Default)]
pub struct IdQueue {
    ids: Vec<EventId>,
    /// Entries below this index have been popped and are logically gone.
    head: usize,
}

impl IdQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending (not yet popped) identities, front first.
    #[must_use]
    pub fn pending(&self) -> &[EventId] {
        &self.ids[self.head..]
    }

    /// Number of pending identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len() - self.head
    }

    /// Whether no identities are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.ids.len()
    }

    /// Pops the next pending identity, or the invalid sentinel if the
    /// queue is empty.
    pub fn pop_next(&mut self) -> EventId {
        if self.is_empty() {
            return EventId::invalid();
        }
        let id = self.ids[self.head];
        self.head += 1;
        id
    }

    /// Queues one identity.
    ///
    /// See [`QueueStrategy`] for duplicate handling and [`QueuePosition`]
    /// for placement. The invalid sentinel is never inserted.
    pub fn queue(
        &mut self,
        id: EventId,
        strategy: QueueStrategy,
        position: QueuePosition,
    ) -> QueueOutcome {
        if !id.is_valid() {
            return QueueOutcome::Invalid;
        }

        let outcome = match strategy {
            QueueStrategy::Discard => {
                if self.pending().contains(&id) {
                    return QueueOutcome::Discarded;
                }
                QueueOutcome::Queued
            }
            QueueStrategy::Replace => {
                if self.remove_pending(|queued| queued == id) > 0 {
                    QueueOutcome::Replaced
                } else {
                    QueueOutcome::Queued
                }
            }
            QueueStrategy::Duplicate => QueueOutcome::Queued,
        };

        match position {
            QueuePosition::Back => self.push_back_block(&[id]),
            QueuePosition::Front => self.push_front_block(&[id]),
        }
        outcome
    }

    /// Queues a sequence of identities.
    ///
    /// Equivalent to repeated [`queue`](Self::queue) calls, with two
    /// deliberate differences:
    ///
    /// - the strategy is applied only against the *pre-existing* queue, so
    ///   duplicates within `ids` themselves always survive (under
    ///   `Discard` each input element is judged against what was queued
    ///   before the call; under `Replace` the pre-existing equivalents are
    ///   removed but the new duplicates coexist)
    /// - front insertion preserves the order of `ids`
    ///
    /// `report` is called once per input element with its individual
    /// outcome.
    pub fn queue_many<I, F>(
        &mut self,
        ids: I,
        strategy: QueueStrategy,
        position: QueuePosition,
        mut report: F,
    ) where
        I: IntoIterator<Item = EventId>,
        F: FnMut(EventId, QueueOutcome),
    {
        let mut add: Vec<EventId> = Vec::new();

        for id in ids {
            if !id.is_valid() {
                report(id, QueueOutcome::Invalid);
                continue;
            }

            match strategy {
                QueueStrategy::Discard => {
                    // additions are buffered, so `pending` still is the
                    // pre-call queue here
                    if self.pending().contains(&id) {
                        report(id, QueueOutcome::Discarded);
                    } else {
                        add.push(id);
                        report(id, QueueOutcome::Queued);
                    }
                }
                QueueStrategy::Replace => {
                    if self.remove_pending(|queued| queued == id) > 0 {
                        report(id, QueueOutcome::Replaced);
                    } else {
                        report(id, QueueOutcome::Queued);
                    }
                    add.push(id);
                }
                QueueStrategy::Duplicate => {
                    add.push(id);
                    report(id, QueueOutcome::Queued);
                }
            }
        }

        if !add.is_empty() {
            match position {
                QueuePosition::Back => self.push_back_block(&add),
                QueuePosition::Front => self.push_front_block(&add),
            }
        }
    }

    /// Removes every pending identity equal to `id`.
    ///
    /// Returns whether anything was removed.
    pub fn unqueue(&mut self, id: EventId) -> bool {
        self.remove_pending(|queued| queued == id) > 0
    }

    /// Removes every pending identity matched by `matcher`.
    ///
    /// Returns whether anything was removed.
    pub fn unqueue_matching<F>(&mut self, mut matcher: F) -> bool
    where
        F: FnMut(EventId) -> bool,
    {
        self.remove_pending(&mut matcher) > 0
    }

    /// Whether `id` is pending.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.pending().contains(&id)
    }

    /// Whether any pending identity is matched by `matcher`.
    ///
    /// Stops at the first positive match. A matcher that always returns
    /// `false` sees every pending identity, which makes this usable for
    /// plain inspection as well.
    #[must_use]
    pub fn contains_matching<F>(&self, mut matcher: F) -> bool
    where
        F: FnMut(EventId) -> bool,
    {
        self.pending().iter().any(|&queued| matcher(queued))
    }

    /// Removes pending entries matching `matcher`; returns how many.
    fn remove_pending<F>(&mut self, mut matcher: F) -> usize
    where
        F: FnMut(EventId) -> bool,
    {
        let before = self.ids.len();
        let head = self.head;
        let mut index = 0;
        self.ids.retain(|&queued| {
            let keep = index < head || !matcher(queued);
            index += 1;
            keep
        });
        // retain shifted everything left of head as well, but entries
        // below head are never matched, so only the pending tail shrank
        before - self.ids.len()
    }

    /// Inserts a block at the front, preserving its internal order.
    fn push_front_block(&mut self, block: &[EventId]) {
        if block.len() <= self.head {
            // enough space in the popped prefix
            let start = self.head - block.len();
            self.ids[start..self.head].copy_from_slice(block);
            self.head = start;
        } else {
            // rebuild: new block followed by the surviving tail
            let mut rebuilt = Vec::with_capacity(block.len() + self.len());
            rebuilt.extend_from_slice(block);
            rebuilt.extend_from_slice(&self.ids[self.head..]);
            self.ids = rebuilt;
            self.head = 0;
        }
    }

    /// Appends a block at the back, compacting first if capacity is tight.
    fn push_back_block(&mut self, block: &[EventId]) {
        if self.head > 0 && self.ids.capacity() - self.ids.len() < block.len() {
            self.ids.drain(..self.head);
            self.head = 0;
        }
        self.ids.extend_from_slice(block);
    }
}

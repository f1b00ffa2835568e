//! The priority-ordered handler registry.
//!
//! One ordered handler chain per event id. Chains are kept sorted at
//! insertion time; dispatch takes a snapshot of a chain so that handlers
//! are invoked without any registry lock held; handlers may connect and
//! disconnect freely while running.

use crate::error::RuntimeError;
use crate::event::EventPtr;
use crate::manager::connection::Disconnector;
use crate::manager::{Handler, Priority};
use ircbus_event::EventId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A handler as stored and snapshotted: shared, callable from anywhere.
pub(crate) type SharedHandler = Arc<dyn Fn(&EventPtr) -> Result<(), RuntimeError> + Send + Sync>;

struct HandlerEntry {
    priority: Priority,
    /// Connection token; doubles as the insertion sequence number.
    token: u64,
    handler: SharedHandler,
}

#[derive(Default)]
struct Chains {
    by_id: HashMap<EventId, Vec<HandlerEntry>>,
    next_token: u64,
}

/// The handler registry of an event manager.
///
/// Shared between the manager (connect, snapshot) and the connection
/// tokens it mints (disconnect, liveness probe); connections reference it
/// weakly so they may outlive the manager.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    chains: Mutex<Chains>,
}

impl HandlerRegistry {
    /// Inserts a handler into the chain for `id`; returns its token.
    ///
    /// The chain stays sorted by `(priority, insertion)`. The FIRST bucket
    /// inverts insertion order: a new FIRST handler is placed in front of
    /// the FIRST handlers already present.
    pub(crate) fn connect(&self, id: EventId, handler: Handler, priority: Priority) -> u64 {
        let mut chains = self.chains.lock();
        let token = chains.next_token;
        chains.next_token += 1;

        let chain = chains.by_id.entry(id).or_default();
        let at = if priority == Priority::FIRST {
            chain.partition_point(|entry| entry.priority < priority)
        } else {
            chain.partition_point(|entry| entry.priority <= priority)
        };
        chain.insert(
            at,
            HandlerEntry {
                priority,
                token,
                handler: Arc::from(handler),
            },
        );
        token
    }

    /// Clones the chain for `id` in dispatch order.
    pub(crate) fn snapshot(&self, id: EventId) -> Vec<SharedHandler> {
        let chains = self.chains.lock();
        match chains.by_id.get(&id) {
            Some(chain) => chain.iter().map(|entry| entry.handler.clone()).collect(),
            None => Vec::new(),
        }
    }
}

impl Disconnector for HandlerRegistry {
    fn disconnect(&self, token: u64) -> bool {
        let mut chains = self.chains.lock();
        for chain in chains.by_id.values_mut() {
            if let Some(at) = chain.iter().position(|entry| entry.token == token) {
                chain.remove(at);
                return true;
            }
        }
        false
    }

    fn is_connected(&self, token: u64) -> bool {
        let chains = self.chains.lock();
        chains
            .by_id
            .values()
            .any(|chain| chain.iter().any(|entry| entry.token == token))
    }
}

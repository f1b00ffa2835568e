//! Identifier types shared across the ircbus crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-instance identifier for an event object.
///
/// Every event minted by an IRC context carries an `EventUid` so that log
/// lines emitted while the event travels through handler chains, the main
/// queue and follow-up queues can be correlated. The uid says nothing about
/// what *kind* of event this is (that is the job of the event id); it only
/// distinguishes one event instance from another.
///
/// # Example
///
/// ```
/// use ircbus_types::EventUid;
///
/// let a = EventUid::new();
/// let b = EventUid::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventUid(Uuid);

impl EventUid {
    /// Creates a fresh uid (random UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventUid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}

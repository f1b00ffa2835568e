//! Handler priorities.

use serde::{Deserialize, Serialize};

/// How early or late within one event id a handler runs.
///
/// Handlers connected to the same id run in ascending priority. The named
/// levels form a ladder with gaps of 200; any integer in between is
/// accepted for fine-grained placement.
///
/// Ties are broken by connection order (first connected, first run), with
/// one exception: handlers connected at [`FIRST`](Self::FIRST) run in
/// *reverse* connection order, so the most recently installed interceptor
/// stands in front of every earlier one.
///
/// # Example
///
/// ```
/// use ircbus_runtime::Priority;
///
/// assert!(Priority::FILTER < Priority::NORMAL);
/// assert!(Priority::NORMAL < Priority::SUMMARIZE);
///
/// // anything between the named rungs is fine
/// let just_before_normal = Priority(-1);
/// assert!(just_before_normal < Priority::NORMAL);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub i32);

impl Priority {
    /// Must run before everything else.
    ///
    /// Unlike every other priority, handlers connect here in a last come,
    /// first serve manner.
    pub const FIRST: Priority = Priority(-1000);
    /// Filters or rewrites the event before it is handled.
    pub const FILTER: Priority = Priority(-800);
    /// Runs before normal subscribers.
    pub const HIGHEST: Priority = Priority(-600);
    /// Runs before normal subscribers.
    pub const HIGHER: Priority = Priority(-400);
    /// Runs before normal subscribers.
    pub const HIGH: Priority = Priority(-200);
    /// A normal subscriber.
    pub const NORMAL: Priority = Priority(0);
    /// Runs after normal subscribers.
    pub const LOW: Priority = Priority(200);
    /// Runs after normal subscribers.
    pub const LOWER: Priority = Priority(400);
    /// Runs after normal subscribers.
    pub const LOWEST: Priority = Priority(600);
    /// Acts on the combined results of the earlier handlers.
    pub const SUMMARIZE: Priority = Priority(800);
    /// Must run after all other handlers have finished.
    pub const LAST: Priority = Priority(1000);
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

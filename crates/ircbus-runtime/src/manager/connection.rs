//! Handler connection tokens.

use std::sync::Weak;

/// The disconnection capability an event manager hands to its connections.
///
/// Implemented by the manager's handler registry. Tokens are monotonically
/// increasing and never reused, so both operations are naturally
/// idempotent.
pub trait Disconnector: Send + Sync {
    /// Removes the handler registered under `token`.
    ///
    /// Returns whether a handler was removed; an unknown (already removed)
    /// token is a no-op.
    fn disconnect(&self, token: u64) -> bool;

    /// Whether a handler is still registered under `token`.
    fn is_connected(&self, token: u64) -> bool;
}

/// The opaque token yielded when connecting an event handler.
///
/// A connection owns one disconnection capability for the handler it was
/// created for. It holds its manager's registry weakly: disconnecting
/// after the manager was destroyed is a safe no-op rather than undefined
/// behavior, so tokens may outlive the manager.
///
/// Connections are totally ordered; all connections minted by one manager
/// sort together, ordered by connection sequence.
#[derive(Clone)]
pub struct Connection {
    hub: Weak<dyn Disconnector>,
    token: u64,
}

impl Connection {
    /// Creates a connection for `token`, backed by the given registry.
    ///
    /// Called by event manager implementations when a handler is
    /// connected.
    #[must_use]
    pub fn new(hub: Weak<dyn Disconnector>, token: u64) -> Self {
        Self { hub, token }
    }

    /// Disconnects the associated event handler.
    ///
    /// Idempotent: disconnecting twice (from this or any cloned token) has
    /// the same effect as disconnecting once. Returns whether a handler
    /// was actually removed by this call.
    pub fn disconnect(&self) -> bool {
        match self.hub.upgrade() {
            Some(hub) => hub.disconnect(self.token),
            None => false,
        }
    }

    /// Whether the associated event handler is still connected.
    ///
    /// `false` once disconnected or after the manager was destroyed.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        match self.hub.upgrade() {
            Some(hub) => hub.is_connected(self.token),
            None => false,
        }
    }

    /// A stable identity for the registry this connection belongs to.
    fn hub_addr(&self) -> usize {
        self.hub.as_ptr() as *const () as usize
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token && self.hub_addr() == other.hub_addr()
    }
}

impl Eq for Connection {}

impl PartialOrd for Connection {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Connection {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.hub_addr(), self.token).cmp(&(other.hub_addr(), other.token))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("token", &self.token)
            .field("connected", &self.is_connected())
            .finish()
    }
}

//! The event manager: dispatch kernel, handler registry, connections.
//!
//! The manager side of the bus splits into:
//!
//! - [`EventManager`]: the module API every event manager provides:
//!   connecting handlers, posting, waiting, and the nested dispatch loop
//! - [`StandardEventManager`]: the default implementation installed into
//!   every new context
//! - [`Connection`] / [`Disconnector`]: stable disconnection tokens
//! - [`Priority`]: the handler priority ladder
//! - [`DispatchEvent`] / [`HandleAfterwards`]: the reserved event kinds
//!   and the follow-up component the dispatch loop consumes

mod api;
mod connection;
mod priority;
mod registry;
mod standard;

pub use api::{Consumer, DispatchEvent, EventManager, HandleAfterwards, Handler};
pub use connection::{Connection, Disconnector};
pub use priority::Priority;
pub use standard::StandardEventManager;

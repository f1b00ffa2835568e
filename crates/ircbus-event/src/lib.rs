//! Typed event identities and the per-event identity queue.
//!
//! This crate is the identity half of the ircbus event system. It knows
//! nothing about contexts, handlers or threads; it defines *what an event
//! kind is* and *in which order one event gets re-dispatched*:
//!
//! - [`EventId`] / [`Origin`]: the `(origin type, ordinal)` pair the bus
//!   dispatches on. Modules mint ids from their own enums; ids from
//!   different enums never collide even when the ordinals match.
//! - [`EventKind`] / [`event_kinds!`]: declaration-time registration of an
//!   enum as an id source. Unregistered enums fail to compile, not to run.
//! - [`IdQueue`] with [`QueueStrategy`], [`QueuePosition`] and
//!   [`QueueOutcome`]: the ordered list of identities one event is still to
//!   be dispatched as, including the duplicate-handling strategies.
//! - [`EventError`]: the failure kinds of this layer.
//!
//! # Identity, not payload
//!
//! ```text
//!  event_kinds! { enum Msg { Privmsg, Notice } }       (module A)
//!  event_kinds! { enum Ctcp { Version, Ping } }        (module B)
//!            │                         │
//!            ▼                         ▼
//!      EventId(Msg, 0) ≠ EventId(Ctcp, 0)
//!            │
//!            ▼
//!  per-identity handler chains in the event manager
//! ```
//!
//! The payload of an event lives in its component container (see
//! `ircbus-component`); dispatch never inspects it.

mod error;
mod id;
mod queue;

pub use error::EventError;
pub use id::{EventId, EventKind, Origin};
pub use queue::{IdQueue, QueueOutcome, QueuePosition, QueueStrategy};

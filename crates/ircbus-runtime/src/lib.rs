//! The ircbus runtime: event objects, the dispatch kernel, and the IRC
//! context.
//!
//! An application builds an IRC client by creating an [`Irc`] context,
//! loading modules into it, and driving everything through events:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Irc context                          │
//! │  ┌─────────────────┐   ┌───────────────────────────────────┐ │
//! │  │  component bag  │   │          module container         │ │
//! │  │  (ClientConfig, │   │  one module per base API slot;    │ │
//! │  │   trackers, …)  │   │  event manager tracked for O(1)   │ │
//! │  └─────────────────┘   └───────────────┬───────────────────┘ │
//! └────────────────────────────────────────┼─────────────────────┘
//!                                          ▼
//!                          ┌────────────────────────────────┐
//!    post() ─ any thread ─►│   StandardEventManager         │
//!                          │   main queue ─ consumers ─ …   │◄─ wait()
//!                          │   per-id handler chains        │   consumer
//!                          └───────────────┬────────────────┘   thread
//!                                          ▼
//!                        handle(): BeginHandling → queued ids
//!                               → FinishingHandling* → FinishedHandling
//!                               → follow-ups to the queue front
//! ```
//!
//! # Dispatch model
//!
//! Each [`Event`] carries an identity queue. [`EventManager::handle`]
//! dispatches the reserved [`DispatchEvent::BeginHandling`] chain, then
//! one chain per queued id (handlers may queue more), then one or more
//! [`DispatchEvent::FinishingHandling`] passes until the queue stays
//! empty, then [`DispatchEvent::FinishedHandling`]. Events scheduled via
//! [`Event::afterwards`] jump the main queue right after.
//!
//! # Threading
//!
//! Posting, connecting and disconnecting are safe from any thread.
//! Waiting ([`EventManager::wait`] and friends) and handling belong on
//! the consumer thread; handlers run there synchronously.

mod config;
mod context;
mod error;
mod event;
mod manager;
mod module;

pub use config::{ClientConfig, ConfigError, ConfigLoader, IdentityConfig, ServerConfig, TimingConfig};
pub use context::Irc;
pub use error::RuntimeError;
pub use event::{Event, EventPtr};
pub use manager::{
    Connection, Consumer, DispatchEvent, Disconnector, EventManager, HandleAfterwards, Handler,
    Priority, StandardEventManager,
};
pub use module::{LoadModule, Module};

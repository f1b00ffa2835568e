//! Build IRC clients as compositions of modules cooperating over a typed,
//! in-process event bus.
//!
//! This crate re-exports the ircbus workspace as one surface:
//!
//! | Layer | Crate | Highlights |
//! |-------|-------|------------|
//! | identity | `ircbus-event` | [`EventId`], [`event_kinds!`], [`QueueStrategy`] |
//! | payload | `ircbus-component` | [`Component`], [`ComponentContainer`] |
//! | runtime | `ircbus-runtime` | [`Irc`], [`Event`], [`EventManager`], [`Priority`] |
//! | shared | `ircbus-types` | [`ErrorCode`], [`EventUid`] |
//!
//! # A minimal client loop
//!
//! ```
//! use ircbus::prelude::*;
//!
//! event_kinds! {
//!     enum ClientEvent {
//!         Startup,
//!     }
//! }
//!
//! let irc = Irc::new();
//!
//! let _connection = irc.event_manager().connect_fn(
//!     ClientEvent::Startup,
//!     |event| {
//!         println!("starting up as {}", event.origin_id());
//!         Ok(())
//!     },
//!     Priority::NORMAL,
//! );
//!
//! irc.event_manager().post(irc.make_event(ClientEvent::Startup)?);
//!
//! while let Some(event) = irc.event_manager().wait_timeout(std::time::Duration::ZERO) {
//!     event.handle()?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! See `examples/minibot.rs` for a fuller composition.

pub use ircbus_component::{Component, ComponentContainer, ComponentError};
pub use ircbus_event::{
    event_kinds, EventError, EventId, EventKind, IdQueue, Origin, QueueOutcome, QueuePosition,
    QueueStrategy,
};
pub use ircbus_runtime::{
    ClientConfig, ConfigError, ConfigLoader, Connection, Consumer, DispatchEvent, Disconnector,
    Event, EventManager, EventPtr, HandleAfterwards, Handler, IdentityConfig, Irc, LoadModule,
    Module, Priority, RuntimeError, ServerConfig, StandardEventManager, TimingConfig,
};
pub use ircbus_types::{ErrorCode, EventUid};

/// The types nearly every client pulls in.
pub mod prelude {
    pub use crate::{
        event_kinds, Component, Event, EventId, EventKind, EventManager, EventPtr, Irc,
        LoadModule, Module, Priority, QueueOutcome, QueuePosition, QueueStrategy, RuntimeError,
    };
}

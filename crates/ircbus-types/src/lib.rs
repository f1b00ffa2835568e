//! Shared primitive types for ircbus.
//!
//! This crate is the root of the ircbus dependency graph. It carries the
//! pieces every other layer needs:
//!
//! - [`ErrorCode`]: the unified error interface implemented by every error
//!   type in the workspace, plus the [`assert_error_code`] /
//!   [`assert_error_codes`] test helpers
//! - [`EventUid`]: per-event-instance identifier used for log correlation
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     SDK layer                        │
//! ├──────────────────────────────────────────────────────┤
//! │  ircbus-types     : ErrorCode, EventUid  ◄── HERE    │
//! │  ircbus-event     : EventId, EventKind, IdQueue      │
//! │  ircbus-component : Component, ComponentContainer    │
//! ├──────────────────────────────────────────────────────┤
//! │  ircbus-runtime   : Event, EventManager, Irc         │
//! └──────────────────────────────────────────────────────┘
//! ```

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::EventUid;

//! Typed component payloads for ircbus.
//!
//! Events (and the IRC context itself) carry their structured payload as a
//! heterogeneous bag of *components*. This crate defines that bag:
//!
//! - [`Component`]: the trait a payload type implements, declaring the
//!   *base type* whose slot it occupies
//! - [`ComponentContainer`]: the store; at most one occupant per base
//!   slot, typed retrieval, conflicts surfaced as errors
//! - [`ComponentError`]: the failure kinds of this layer
//!
//! # One slot per base type
//!
//! ```text
//!  container
//!  ├── slot<RawLine>      : RawLine { line }
//!  ├── slot<Sender>       : Sender { nick, user, host }
//!  └── slot<Whois>        : WhoisOperator { .. }   ← a Whois stand-in
//! ```
//!
//! Handlers attach components to an in-flight event to publish structured
//! results for later handler chains; the conflict rules guarantee that two
//! modules cannot silently fight over one slot.

mod component;
mod container;
mod error;

pub use component::Component;
pub use container::ComponentContainer;
pub use error::ComponentError;

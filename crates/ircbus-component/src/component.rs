//! The component trait.
//!
//! Components are the typed payload slots of events (and of the IRC context
//! itself). A component type declares a *base* type; a container holds at
//! most one occupant per base slot, so two component types sharing a base
//! are mutually exclusive.
//!
//! Most components are their own base:
//!
//! ```
//! use ircbus_component::Component;
//!
//! /// The raw line a message event was parsed from.
//! struct RawLine {
//!     pub line: String,
//! }
//!
//! impl Component for RawLine {
//!     type Base = RawLine;
//! }
//! ```
//!
//! A specialized variant competes for its base's slot by naming it:
//!
//! ```
//! use ircbus_component::Component;
//!
//! struct Whois { pub nick: String }
//! impl Component for Whois { type Base = Whois; }
//!
//! /// Extended WHOIS data; occupies the same slot as `Whois`.
//! struct WhoisOperator { pub nick: String, pub privileges: String }
//! impl Component for WhoisOperator { type Base = Whois; }
//! ```
//!
//! A container can then hold a `Whois` *or* a `WhoisOperator`, never both.
//! Retrieval asks for a concrete type; an occupant of a different concrete
//! type in the same slot reports a conflict.

use std::any::Any;

/// A typed payload slot occupant.
///
/// # Declaring the base
///
/// `Base` names the slot this component competes for. Components are
/// usually their own base (`type Base = Self`); a component standing in
/// for another names that other type. The base must itself be a component
/// so that slot-level operations ([`remove_any`], [`has`]) can be phrased
/// against it.
///
/// # Thread model
///
/// Components travel inside events across threads, so they must be `Send`.
/// They are only ever accessed through their container's lock, which is why
/// `Sync` is not required.
///
/// [`remove_any`]: crate::ComponentContainer::remove_any
/// [`has`]: crate::ComponentContainer::has
pub trait Component: Any + Send {
    /// The base component type whose slot this component occupies.
    ///
    /// Components with the same base are mutually exclusive within one
    /// container.
    type Base: Component;
}

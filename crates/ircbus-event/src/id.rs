//! Typed event identities.
//!
//! An [`EventId`] is the bus's primary dispatch key. It pairs the *origin*
//! (the enum type the id was minted from) with the enum value's numeric
//! ordinal. Two ids are only equal when both parts match, so independently
//! authored modules can declare their own event kinds without any central
//! registry: `connection::Kind::Raw` and `parser::Kind::Raw` stay distinct
//! even if both happen to be ordinal 0.
//!
//! # Declaring event kinds
//!
//! An enum becomes eligible as an event id source by implementing
//! [`EventKind`]. The [`event_kinds!`](crate::event_kinds) macro declares
//! the enum and the impl in one step:
//!
//! ```
//! use ircbus_event::{event_kinds, EventId};
//!
//! event_kinds! {
//!     /// Events raised while a connection is being established.
//!     pub enum ConnectionEvent {
//!         Connecting,
//!         Connected,
//!         Disconnected,
//!     }
//! }
//!
//! let id = EventId::from(ConnectionEvent::Connected);
//! assert!(id.is_valid());
//! assert!(id.is_of::<ConnectionEvent>());
//! assert_eq!(id.get::<ConnectionEvent>(), Ok(ConnectionEvent::Connected));
//! ```
//!
//! Implementing the trait by hand is equally valid for enums that already
//! exist; the impl itself *is* the registration, so an unregistered enum is
//! rejected at compile time rather than at the first dispatch.

use crate::error::EventError;
use std::any::TypeId;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// An enum type that may be used as an event id source.
///
/// Implementing this trait registers the enum with the bus. The bus stores
/// ordinals as `u32`, so the trait fixes that width for every registered
/// enum; `#[repr(u32)]` on the enum keeps the conversion lossless.
///
/// Prefer the [`event_kinds!`](crate::event_kinds) macro over a manual
/// impl: it declares the enum, the repr and both conversions together.
pub trait EventKind: Copy + Send + Sync + 'static {
    /// The numeric value of this kind within its enum.
    fn ordinal(self) -> u32;

    /// The inverse of [`ordinal`](Self::ordinal).
    ///
    /// Returns `None` for values that do not name a variant.
    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

/// The origin half of an event id: a process-stable token for the enum type
/// the id was minted from.
///
/// Equality, ordering and hashing consider only the type; the captured type
/// name exists for `Display` output. Ordering between distinct origins is
/// arbitrary but consistent within a process, which is all the bus needs to
/// keep its keys sorted.
#[derive(Debug, Clone, Copy)]
pub struct Origin {
    type_id: TypeId,
    name: &'static str,
}

impl Origin {
    /// The origin token for a registered event kind enum.
    #[must_use]
    pub fn of<K: EventKind>() -> Self {
        Self {
            type_id: TypeId::of::<K>(),
            name: std::any::type_name::<K>(),
        }
    }

    /// Checks whether this origin is the given enum type.
    #[must_use]
    pub fn is<K: EventKind>(&self) -> bool {
        self.type_id == TypeId::of::<K>()
    }

    /// The full type name of the origin enum.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Origin {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Origin {}

impl PartialOrd for Origin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Origin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id.cmp(&other.type_id)
    }
}

impl Hash for Origin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // strip the module path; the short name reads better in logs
        let short = self.name.rsplit("::").next().unwrap_or(self.name);
        f.write_str(short)
    }
}

/// A typed event identity: `(origin, ordinal)`.
///
/// Ids are small `Copy` values. Once constructed they are immutable.
///
/// The default-constructed id is the *invalid sentinel*: it has no origin,
/// compares unequal to every valid id and orders strictly before all of
/// them. Using it where a valid id is required fails with
/// [`EventError::InvalidId`].
///
/// # Ordering and hashing
///
/// Ids order lexicographically by `(origin, ordinal)` with the invalid
/// sentinel first. Equal ids hash equally; hashes are stable within a
/// process but not across runs (the origin token is a
/// [`TypeId`](std::any::TypeId)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EventId {
    origin: Option<Origin>,
    ordinal: u32,
}

impl EventId {
    /// Mints the id for a registered event kind value.
    #[must_use]
    pub fn of<K: EventKind>(kind: K) -> Self {
        Self {
            origin: Some(Origin::of::<K>()),
            ordinal: kind.ordinal(),
        }
    }

    /// The invalid sentinel id.
    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Whether this id is valid (was minted from a registered enum).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.origin.is_some()
    }

    /// The origin token, or `None` for the invalid sentinel.
    #[must_use]
    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    /// The numeric ordinal. Zero for the invalid sentinel.
    #[must_use]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Checks whether this id was minted from the enum type `K`.
    ///
    /// Always `false` for the invalid sentinel.
    #[must_use]
    pub fn is_of<K: EventKind>(&self) -> bool {
        self.origin.as_ref().is_some_and(|origin| origin.is::<K>())
    }

    /// Recovers the enum value this id was minted from.
    ///
    /// # Errors
    ///
    /// Fails with [`EventError::TypeMismatch`] when the id originates from
    /// a different enum type (or is the invalid sentinel).
    pub fn get<K: EventKind>(&self) -> Result<K, EventError> {
        if !self.is_of::<K>() {
            return Err(EventError::TypeMismatch);
        }
        K::from_ordinal(self.ordinal).ok_or(EventError::TypeMismatch)
    }
}

impl<K: EventKind> From<K> for EventId {
    fn from(kind: K) -> Self {
        Self::of(kind)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}#{}", origin, self.ordinal),
            None => f.write_str("invalid"),
        }
    }
}

/// Declares a `#[repr(u32)]` enum and registers it as an event kind.
///
/// This is the declaration-time registration required for an enum to be
/// usable as an event id source; enums without an [`EventKind`] impl are
/// rejected by the compiler wherever an id would be minted.
///
/// # Example
///
/// ```
/// use ircbus_event::{event_kinds, EventId, EventKind};
///
/// event_kinds! {
///     pub enum NumericEvent {
///         Welcome = 1,
///         YourHost = 2,
///         Created = 3,
///     }
/// }
///
/// assert_eq!(NumericEvent::Created.ordinal(), 3);
/// assert_eq!(NumericEvent::from_ordinal(2), Some(NumericEvent::YourHost));
/// assert_eq!(NumericEvent::from_ordinal(99), None);
///
/// let id: EventId = NumericEvent::Welcome.into();
/// assert_eq!(id.ordinal(), 1);
/// ```
#[macro_export]
macro_rules! event_kinds {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident $(= $value:expr)?),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        $vis enum $name {
            $($(#[$vmeta])* $variant $(= $value)?,)+
        }

        impl $crate::EventKind for $name {
            fn ordinal(self) -> u32 {
                self as u32
            }

            fn from_ordinal(ordinal: u32) -> ::core::option::Option<Self> {
                $(
                    if ordinal == $name::$variant as u32 {
                        return ::core::option::Option::Some($name::$variant);
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}

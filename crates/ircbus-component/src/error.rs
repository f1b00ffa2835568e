//! Component layer errors.
//!
//! # Error Code Convention
//!
//! All component errors use the `COMPONENT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`ComponentError::Conflict`] | `COMPONENT_CONFLICT` | No |
//! | [`ComponentError::NotFound`] | `COMPONENT_NOT_FOUND` | No |
//!
//! Neither is recoverable by retry: the container's contents only change
//! when some caller changes them.

use ircbus_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Component container error.
///
/// # Variants
///
/// | Variant | When |
/// |---------|------|
/// | [`Conflict`](Self::Conflict) | The requested base slot is occupied by an incompatible component |
/// | [`NotFound`](Self::NotFound) | A retrieval demanded a component from an empty slot |
///
/// On insertion, *any* occupant of the base slot conflicts. On retrieval
/// and typed removal, an occupant of a different concrete type conflicts;
/// going through the base type bypasses the check.
///
/// # Example
///
/// ```
/// use ircbus_component::{Component, ComponentContainer, ComponentError};
/// use ircbus_types::ErrorCode;
///
/// #[derive(Debug)]
/// struct Motd(String);
/// impl Component for Motd { type Base = Motd; }
///
/// let container = ComponentContainer::new();
/// let err = container.at::<Motd>().unwrap_err();
/// assert_eq!(err, ComponentError::NotFound);
/// assert_eq!(err.code(), "COMPONENT_NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ComponentError {
    /// The container holds a conflicting component in the requested slot.
    #[error("the container holds a conflicting component in the requested slot")]
    Conflict,

    /// No component occupies the requested slot.
    #[error("no component occupies the requested slot")]
    NotFound,
}

impl ErrorCode for ComponentError {
    fn code(&self) -> &'static str {
        match self {
            Self::Conflict => "COMPONENT_CONFLICT",
            Self::NotFound => "COMPONENT_NOT_FOUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ircbus_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&[ComponentError::Conflict, ComponentError::NotFound], "COMPONENT_");
    }

    #[test]
    fn nothing_is_recoverable() {
        assert!(!ComponentError::Conflict.is_recoverable());
        assert!(!ComponentError::NotFound.is_recoverable());
    }
}

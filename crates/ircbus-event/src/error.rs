//! Event layer errors.
//!
//! # Error Code Convention
//!
//! All event errors use the `EVENT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EventError::InvalidId`] | `EVENT_INVALID_ID` | No |
//! | [`EventError::TypeMismatch`] | `EVENT_TYPE_MISMATCH` | No |
//!
//! Neither failure changes on retry: both indicate a bug in the caller.
//! There is deliberately no "unregistered identity type" variant: enum
//! registration is an [`EventKind`](crate::EventKind) impl, so the compiler
//! rejects unregistered enums before an id can be minted at all.

use ircbus_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event layer error.
///
/// # Example
///
/// ```
/// use ircbus_event::{event_kinds, EventError, EventId};
/// use ircbus_types::ErrorCode;
///
/// event_kinds! {
///     enum Kind { A }
/// }
///
/// let err = EventId::invalid().get::<Kind>().unwrap_err();
/// assert_eq!(err, EventError::TypeMismatch);
/// assert_eq!(err.code(), "EVENT_TYPE_MISMATCH");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum EventError {
    /// The invalid sentinel id was used where a valid id is required:
    /// constructing an event with it, or dispatching a handler chain for it.
    #[error("an invalid event id was used where a valid event id is required")]
    InvalidId,

    /// An event id was queried as an enum type other than its origin.
    #[error("event id queried as a different kind than it was minted from")]
    TypeMismatch,
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "EVENT_INVALID_ID",
            Self::TypeMismatch => "EVENT_TYPE_MISMATCH",
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

    fn all_variants() -> Vec<EventError> {
        vec![EventError::InvalidId, EventError::TypeMismatch]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "EVENT_");
    }

    #[test]
    fn nothing_is_recoverable() {
        for err in all_variants() {
            assert!(!err.is_recoverable(), "{} should not be recoverable", err.code());
        }
    }

    #[test]
    fn messages_name_the_problem() {
        assert!(EventError::InvalidId.to_string().contains("invalid event id"));
        assert!(EventError::TypeMismatch.to_string().contains("different kind"));
    }
}

//! Runtime layer errors.
//!
//! # Error Code Convention
//!
//! All runtime errors use the `RUNTIME_` prefix; errors bubbling up from
//! the event and component layers keep their own codes:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`RuntimeError::ModuleConflict`] | `RUNTIME_MODULE_CONFLICT` | No |
//! | [`RuntimeError::ModuleNotFound`] | `RUNTIME_MODULE_NOT_FOUND` | No |
//! | [`RuntimeError::AlreadyConnected`] | `RUNTIME_ALREADY_CONNECTED` | No |
//! | [`RuntimeError::ContextDropped`] | `RUNTIME_CONTEXT_DROPPED` | No |
//! | [`RuntimeError::HandlerFailed`] | `RUNTIME_HANDLER_FAILED` | Yes |
//! | [`RuntimeError::Event`] | delegated | delegated |
//! | [`RuntimeError::Component`] | delegated | delegated |

use ircbus_component::ComponentError;
use ircbus_event::EventError;
use ircbus_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime layer error.
///
/// Covers the module container, the dispatch kernel, and failures wrapped
/// from the lower layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RuntimeError {
    /// The context holds a conflicting module.
    ///
    /// On `load`, any module sharing the requested base API slot conflicts.
    /// On `unload` and `get`, an occupant of a different concrete type
    /// conflicts; going through the base API bypasses the check.
    #[error("the context holds a conflicting module for the requested API")]
    ModuleConflict,

    /// No module occupies the requested base API slot.
    #[error("no module is loaded for the requested API")]
    ModuleNotFound,

    /// A connection is already being or has been established.
    ///
    /// Reserved for connection modules; the dispatch core itself never
    /// raises this kind.
    #[error("the connection already is being established or has been established")]
    AlreadyConnected,

    /// The IRC context an event belongs to has been dropped.
    ///
    /// Events must not outlive their context; an event operated on after
    /// context teardown reports this instead of dispatching.
    #[error("the IRC context this event belongs to no longer exists")]
    ContextDropped,

    /// An event handler reported a failure.
    ///
    /// The failing handler aborts its chain; the message carries whatever
    /// the handler chose to report.
    #[error("event handler failed: {0}")]
    HandlerFailed(String),

    /// An event layer failure surfaced through a runtime operation.
    #[error(transparent)]
    Event(#[from] EventError),

    /// A component layer failure surfaced through a runtime operation.
    #[error(transparent)]
    Component(#[from] ComponentError),
}

impl RuntimeError {
    /// Wraps an arbitrary handler failure message.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::HandlerFailed(message.into())
    }
}

impl ErrorCode for RuntimeError {
    fn code(&self) -> &'static str {
        match self {
            Self::ModuleConflict => "RUNTIME_MODULE_CONFLICT",
            Self::ModuleNotFound => "RUNTIME_MODULE_NOT_FOUND",
            Self::AlreadyConnected => "RUNTIME_ALREADY_CONNECTED",
            Self::ContextDropped => "RUNTIME_CONTEXT_DROPPED",
            Self::HandlerFailed(_) => "RUNTIME_HANDLER_FAILED",
            Self::Event(err) => err.code(),
            Self::Component(err) => err.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ModuleConflict
            | Self::ModuleNotFound
            | Self::AlreadyConnected
            | Self::ContextDropped => false,
            // a handler may fail on transient conditions of its own
            Self::HandlerFailed(_) => true,
            Self::Event(err) => err.is_recoverable(),
            Self::Component(err) => err.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ircbus_types::assert_error_codes;

    fn own_variants() -> Vec<RuntimeError> {
        vec![
            RuntimeError::ModuleConflict,
            RuntimeError::ModuleNotFound,
            RuntimeError::AlreadyConnected,
            RuntimeError::ContextDropped,
            RuntimeError::HandlerFailed("x".into()),
        ]
    }

    #[test]
    fn own_error_codes_valid() {
        assert_error_codes(&own_variants(), "RUNTIME_");
    }

    #[test]
    fn wrapped_errors_keep_their_codes() {
        let err = RuntimeError::from(EventError::InvalidId);
        assert_eq!(err.code(), "EVENT_INVALID_ID");

        let err = RuntimeError::from(ComponentError::Conflict);
        assert_eq!(err.code(), "COMPONENT_CONFLICT");
    }

    #[test]
    fn wrapped_errors_keep_their_messages() {
        let err = RuntimeError::from(EventError::InvalidId);
        assert_eq!(err.to_string(), EventError::InvalidId.to_string());
    }

    #[test]
    fn handler_failures_are_recoverable() {
        assert!(RuntimeError::handler("timeout talking to services").is_recoverable());
        assert!(!RuntimeError::ModuleConflict.is_recoverable());
    }
}

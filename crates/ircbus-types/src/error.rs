//! Unified error interface for ircbus.
//!
//! Every error type in the ircbus crates implements the [`ErrorCode`]
//! trait, providing:
//!
//! - **Machine-readable codes**: stable UPPER_SNAKE_CASE identifiers that
//!   application code and modules can match on without parsing messages
//! - **Recoverability info**: whether retrying the failed operation can
//!   possibly succeed
//!
//! # Code Convention
//!
//! Codes are prefixed by the layer that produced them:
//!
//! | Prefix | Crate |
//! |--------|-------|
//! | `EVENT_` | `ircbus-event` |
//! | `COMPONENT_` | `ircbus-component` |
//! | `RUNTIME_` | `ircbus-runtime` |
//! | `CONFIG_` | `ircbus-runtime` (config loader) |
//!
//! # Example
//!
//! ```
//! use ircbus_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum NickError {
//!     InUse(String),
//!     Erroneous(String),
//! }
//!
//! impl ErrorCode for NickError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::InUse(_) => "NICK_IN_USE",
//!             Self::Erroneous(_) => "NICK_ERRONEOUS",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         // a taken nickname may free up; a malformed one never will
//!         matches!(self, Self::InUse(_))
//!     }
//! }
//!
//! let err = NickError::InUse("ferris".into());
//! assert_eq!(err.code(), "NICK_IN_USE");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface for ircbus errors.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"EVENT_INVALID_ID"`
/// - **Layer-prefixed**: e.g. `"COMPONENT_CONFLICT"`, `"RUNTIME_MODULE_CONFLICT"`
/// - **Stable**: codes are an API contract and never change once published
///
/// # Recoverability
///
/// An error is recoverable when retrying the operation may succeed (a
/// transient condition such as a timeout). It is not recoverable when the
/// failure is structural: a conflicting component in a container will still
/// conflict on the next attempt, an invalid event id stays invalid.
pub trait ErrorCode {
    /// Returns the machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the ircbus conventions.
///
/// Checks that the code is non-empty, starts with `expected_prefix` and is
/// UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for use
/// in tests.
///
/// # Example
///
/// ```
/// use ircbus_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "NET_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "NET_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use ircbus_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "X_A",
///             Self::B => "X_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "X_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks that a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn error_code_trait() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn assert_error_codes_all_variants() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&TestError::Transient, "OTHER_");
    }

    #[test]
    fn upper_snake_case_rules() {
        assert!(is_upper_snake_case("EVENT_INVALID_ID"));
        assert!(is_upper_snake_case("A1_B2"));

        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("lower_case"));
        assert!(!is_upper_snake_case("Mixed_Case"));
        assert!(!is_upper_snake_case("_LEADING"));
        assert!(!is_upper_snake_case("TRAILING_"));
        assert!(!is_upper_snake_case("DOUBLE__SCORE"));
    }
}

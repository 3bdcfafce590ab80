//! Error code and transport status types.
//!
//! An [`ErrorCode`] is the stable, machine-readable classification of an
//! error. It is the only field callers should branch on. A [`Status`] is the
//! transport-level signal (HTTP status or RPC code) a boundary layer copies
//! into its response.
//!
//! Both are `Copy` newtypes: they are small numeric identities, and passing
//! them by value keeps call sites free of borrows.
//!
//! # Reserved codes
//!
//! - `0` ([`ErrorCode::NIL`]): success. Never registered in a catalog.
//! - `111111` ([`ErrorCode::UNKNOWN`]): the catch-all classification. Its
//!   message always renders as [`UNKNOWN_MESSAGE`].
//!
//! # Example
//!
//! ```rust
//! use coded_errors::{ErrorCode, Status};
//!
//! const QUOTA_EXCEEDED: ErrorCode = ErrorCode::new(1042);
//!
//! assert_eq!(QUOTA_EXCEEDED.to_string(), "1042");
//! assert!(!QUOTA_EXCEEDED.is_nil());
//! assert!(Status::new(503).is_server_error());
//! ```

use std::fmt;

/// Message every [`ErrorCode::UNKNOWN`] error renders, whatever it stores.
pub const UNKNOWN_MESSAGE: &str = "unknown error";

/// Message of the success sentinel.
pub const NIL_MESSAGE: &str = "ok";

/// Stable numeric classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ErrorCode(u32);

impl ErrorCode {
    /// Success; the absent error.
    pub const NIL: ErrorCode = ErrorCode(0);
    /// Malformed input.
    pub const BAD_FORMAT: ErrorCode = ErrorCode(1);
    /// An external command failed.
    pub const RUN_COMMAND_ERROR: ErrorCode = ErrorCode(2);
    /// An operation ran out of time.
    pub const TIMEOUT: ErrorCode = ErrorCode(3);
    /// The requested operation does not exist.
    pub const UNIMPLEMENTED: ErrorCode = ErrorCode(4);
    /// Catch-all classification.
    pub const UNKNOWN: ErrorCode = ErrorCode(111_111);

    /// Wrap a raw code.
    #[inline]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Raw numeric value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// True for the success sentinel.
    #[inline]
    pub const fn is_nil(self) -> bool {
        self.0 == Self::NIL.0
    }

    /// True for the catch-all classification.
    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport status carried next to the code.
///
/// Usually an HTTP status (`400`, `500`, ...) but gRPC codes fit as well;
/// the error value never interprets it beyond the helpers below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Status(i32);

impl Status {
    /// Status of the success sentinel.
    pub const NONE: Status = Status(0);

    /// Wrap a raw status.
    #[inline]
    pub const fn new(status: i32) -> Self {
        Self(status)
    }

    /// Raw numeric value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// `400..=499`.
    #[inline]
    pub const fn is_client_error(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// `500..=599`.
    #[inline]
    pub const fn is_server_error(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl From<i32> for Status {
    fn from(status: i32) -> Self {
        Self(status)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_codes() {
        assert_eq!(ErrorCode::NIL.value(), 0);
        assert_eq!(ErrorCode::UNKNOWN.value(), 111_111);
        assert!(ErrorCode::NIL.is_nil());
        assert!(ErrorCode::UNKNOWN.is_unknown());
        assert!(!ErrorCode::BAD_FORMAT.is_nil());
        assert_eq!(ErrorCode::default(), ErrorCode::NIL);
    }

    #[test]
    fn builtin_codes_are_distinct() {
        let codes = [
            ErrorCode::NIL,
            ErrorCode::BAD_FORMAT,
            ErrorCode::RUN_COMMAND_ERROR,
            ErrorCode::TIMEOUT,
            ErrorCode::UNIMPLEMENTED,
            ErrorCode::UNKNOWN,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_is_plain_number() {
        assert_eq!(ErrorCode::TIMEOUT.to_string(), "3");
        assert_eq!(Status::new(408).to_string(), "408");
        assert_eq!(Status::new(-1).to_string(), "-1");
    }

    #[test]
    fn status_classes() {
        assert!(Status::new(404).is_client_error());
        assert!(!Status::new(404).is_server_error());
        assert!(Status::new(500).is_server_error());
        assert!(!Status::NONE.is_client_error());
        assert!(!Status::NONE.is_server_error());
    }

    #[test]
    fn conversions() {
        let code: ErrorCode = 7u32.into();
        assert_eq!(u32::from(code), 7);
        let status: Status = 201.into();
        assert_eq!(i32::from(status), 201);
    }
}

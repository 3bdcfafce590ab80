//! The error value.
//!
//! An [`Error`] is an immutable record of a transport [`Status`], a stable
//! [`ErrorCode`], a human-readable message, an optional [`Origin`] cause
//! chain and a display hint.
//!
//! Templates (see [`definitions`](crate::definitions) and
//! [`Catalog`](crate::Catalog)) are shared process-wide. Call sites never
//! change them; every `clone_with_*` derivation borrows the template and
//! returns a new, independent value.
//!
//! # The absent error
//!
//! "No error" is the explicit sentinel [`Error::nil()`] (also
//! [`definitions::NIL`](crate::definitions::NIL) and `Error::default()`).
//! Every accessor is defined on it: code `0`, status `0`, message `"ok"`,
//! hint `"ok"`, no origin, and it renders as `"ok"`.
//!
//! # Example
//!
//! ```rust
//! use coded_errors::{definitions, Error};
//!
//! fn run(cmd: &str) -> Result<(), Error> {
//!     std::process::Command::new(cmd)
//!         .status()
//!         .map_err(|e| definitions::RUN_COMMAND_ERROR.clone_with_origin_error(e))?;
//!     Ok(())
//! }
//!
//! let err = run("/definitely/not/here").unwrap_err();
//! assert!(err.is(&definitions::RUN_COMMAND_ERROR));
//! assert_eq!(err.status().value(), 500);
//! assert!(err.to_string().starts_with("run command error[500][2] ("));
//! ```

use crate::codes::{NIL_MESSAGE, UNKNOWN_MESSAGE};
use crate::format::{sprintf, Arg};
use crate::origin::{BoxError, Origin};
use crate::{ErrorCode, Status};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use zeroize::Zeroize;

/// Coded error value with transport status, message, hint and cause chain.
///
/// Serializes as `{"code": <u32>, "message": <string>, "hint": <string>}`;
/// status and origin stay out of the wire shape.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[must_use = "errors should be handled or logged"]
pub struct Error {
    #[cfg_attr(feature = "serde", serde(skip))]
    status: Status,
    code: ErrorCode,
    message: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(skip))]
    origin: Option<Origin>,
    hint: Cow<'static, str>,
}

impl Error {
    /// The success sentinel.
    #[inline]
    pub const fn nil() -> Self {
        Self {
            status: Status::NONE,
            code: ErrorCode::NIL,
            message: Cow::Borrowed(NIL_MESSAGE),
            origin: None,
            hint: Cow::Borrowed(NIL_MESSAGE),
        }
    }

    /// Build a template value without registering it.
    ///
    /// Used for `static` built-ins; runtime templates go through
    /// [`Catalog::register`](crate::Catalog::register) so their codes are
    /// checked for conflicts.
    #[inline]
    pub const fn template(code: ErrorCode, status: Status, message: &'static str) -> Self {
        Self {
            status,
            code,
            message: Cow::Borrowed(message),
            origin: None,
            hint: Cow::Borrowed(""),
        }
    }

    pub(crate) fn from_parts(
        code: ErrorCode,
        status: Status,
        message: Cow<'static, str>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            origin: None,
            hint: Cow::Borrowed(""),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Stable classification; `ErrorCode::NIL` for the sentinel.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Transport status; `0` for the sentinel.
    #[inline]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Attached cause chain, if any.
    #[inline]
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Display message.
    ///
    /// The two reserved codes always render the same text whatever the
    /// stored message says: `"ok"` for NIL and [`UNKNOWN_MESSAGE`] for
    /// UNKNOWN.
    pub fn message(&self) -> &str {
        if self.code.is_nil() {
            NIL_MESSAGE
        } else if self.code.is_unknown() {
            UNKNOWN_MESSAGE
        } else {
            &self.message
        }
    }

    /// Message text to carry into a derived value, borrowing when possible.
    fn derived_message(&self) -> Cow<'static, str> {
        if self.code.is_nil() {
            Cow::Borrowed(NIL_MESSAGE)
        } else if self.code.is_unknown() {
            Cow::Borrowed(UNKNOWN_MESSAGE)
        } else {
            self.message.clone()
        }
    }

    /// Stored hint. Templates carry an empty hint; the sentinel's is `"ok"`.
    #[inline]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// `"ok"` for NIL, otherwise `"<message>[<status>][<code>]"` with
    /// `" (<origin>)"` appended when a cause is attached.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// True when this value means "no error".
    #[inline]
    pub const fn is_nil(&self) -> bool {
        self.code.is_nil()
    }

    /// Alias of [`is_nil`](Self::is_nil).
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.is_nil()
    }

    /// Negation of [`is_nil`](Self::is_nil).
    #[inline]
    pub const fn is_not_nil(&self) -> bool {
        !self.is_nil()
    }

    /// True when `self` carries the same classification as `template`.
    #[inline]
    pub fn is(&self, template: &Error) -> bool {
        self.code == template.code
    }

    // =========================================================================
    // Derivations
    // =========================================================================

    /// Reclassify an underlying failure under this template.
    ///
    /// Status, code, message and hint are copied; `origin` becomes the cause,
    /// annotated with the caller's location.
    ///
    /// ```rust
    /// # use coded_errors::definitions;
    /// let err = definitions::BAD_FORMAT.clone_with_origin_error("unexpected token `}`");
    /// assert_eq!(err.to_string(), "bad format[400][1] (unexpected token `}`)");
    /// assert!(definitions::BAD_FORMAT.origin().is_none());
    /// ```
    #[track_caller]
    pub fn clone_with_origin_error(&self, origin: impl Into<BoxError>) -> Error {
        self.clone_with_origin(Some(Origin::new(origin)))
    }

    /// Like [`clone_with_origin_error`](Self::clone_with_origin_error) but
    /// accepts an already-built chain, or none at all.
    #[track_caller]
    pub fn clone_with_origin(&self, origin: Option<Origin>) -> Error {
        let location = Location::caller();
        Error {
            status: self.status,
            code: self.code,
            message: self.derived_message(),
            origin: origin.map(|o| o.with_stack(location)),
            hint: self.hint.clone(),
        }
    }

    /// Fill the message's `%` verbs with `args`.
    ///
    /// Status, code and hint are copied; an existing origin is kept and
    /// re-annotated with the caller's location. Bad verbs or argument counts
    /// show up as markers in the message (see [`format`](crate::format)).
    ///
    /// ```rust
    /// # use coded_errors::{Catalog, ErrorCode, Status, format::Arg};
    /// let mut catalog = Catalog::new();
    /// let quota = catalog.register(ErrorCode::new(42), Status::new(429), "quota %d/%d used");
    /// let err = quota.clone_with_format(&[Arg::from(10), Arg::from(10)]);
    /// assert_eq!(err.message(), "quota 10/10 used");
    /// assert_eq!(quota.message(), "quota %d/%d used");
    /// ```
    #[track_caller]
    pub fn clone_with_format(&self, args: &[Arg<'_>]) -> Error {
        let location = Location::caller();
        Error {
            status: self.status,
            code: self.code,
            message: Cow::Owned(sprintf(self.message(), args)),
            origin: self.origin.clone().map(|o| o.with_stack(location)),
            hint: self.hint.clone(),
        }
    }

    /// Attach a display hint.
    ///
    /// Status, code and message are copied. The hint is also wrapped around
    /// an existing origin so it shows up in the rendered cause chain.
    pub fn clone_with_hint(&self, hint: impl Into<Cow<'static, str>>) -> Error {
        let hint = hint.into();
        Error {
            status: self.status,
            code: self.code,
            message: self.derived_message(),
            origin: self.origin.clone().map(|o| o.with_message(hint.clone())),
            hint,
        }
    }
}

impl Default for Error {
    fn default() -> Self {
        Self::nil()
    }
}

impl Drop for Error {
    fn drop(&mut self) {
        // Formatted messages and hints may carry caller data.
        if let Cow::Owned(ref mut s) = self.message {
            s.zeroize();
        }
        if let Cow::Owned(ref mut s) = self.hint {
            s.zeroize();
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return f.write_str(NIL_MESSAGE);
        }
        write!(f, "{}[{}][{}]", self.message(), self.status, self.code)?;
        if let Some(origin) = &self.origin {
            f.write_str(" (")?;
            fmt::Display::fmt(origin, f)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("status", &self.status.value())
            .field("code", &self.code.value())
            .field("message", &self.message())
            .field("hint", &self.hint)
            .field("origin", &self.origin)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.origin
            .as_ref()
            .map(|o| o as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions;
    use std::io;
    use std::sync::Arc;
    use std::thread;

    fn custom(code: u32, status: i32, message: &'static str) -> Error {
        Error::template(ErrorCode::new(code), Status::new(status), message)
    }

    // ========================================================================
    // Sentinel
    // ========================================================================

    #[test]
    fn nil_accessors() {
        let nil = Error::nil();
        assert!(nil.is_nil());
        assert!(nil.is_ok());
        assert!(!nil.is_not_nil());
        assert_eq!(nil.code(), ErrorCode::NIL);
        assert_eq!(nil.status(), Status::NONE);
        assert_eq!(nil.message(), "ok");
        assert_eq!(nil.hint(), "ok");
        assert!(nil.origin().is_none());
        assert_eq!(nil.render(), "ok");
    }

    #[test]
    fn default_is_nil() {
        assert!(Error::default().is_nil());
        assert!(Error::default().is(&definitions::NIL));
    }

    #[test]
    fn nil_clone_without_origin_stays_nil() {
        let cloned = Error::nil().clone_with_origin(None);
        assert_eq!(cloned.code(), Error::nil().code());
        assert!(cloned.origin().is_none());
        assert_eq!(cloned.hint(), "ok");
    }

    #[test]
    fn nil_clone_with_cause_keeps_nil_classification() {
        let cloned = Error::nil().clone_with_origin_error("ignored for classification");
        assert!(cloned.is_nil());
        assert!(cloned.origin().is_some());
        assert_eq!(cloned.render(), "ok");
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    #[test]
    fn render_without_origin() {
        let t = custom(7001, 409, "conflict");
        assert_eq!(t.render(), "conflict[409][7001]");
    }

    #[test]
    fn render_with_origin() {
        let t = custom(7002, 502, "upstream failed");
        let err = t.clone_with_origin_error(io::Error::other("connection reset"));
        assert_eq!(err.render(), "upstream failed[502][7002] (connection reset)");
    }

    #[test]
    fn render_nil_ignores_every_other_field() {
        let hinted = Error::nil().clone_with_hint("anything");
        assert_eq!(hinted.render(), "ok");
    }

    #[test]
    fn alternate_render_includes_attach_site() {
        let err = custom(7003, 500, "boom").clone_with_origin_error("root");
        let rendered = format!("{err:#}");
        assert!(rendered.starts_with("boom[500][7003] (root\n    at "));
        assert!(rendered.contains("error.rs"));
    }

    // ========================================================================
    // Message overrides
    // ========================================================================

    #[test]
    fn unknown_code_always_renders_fixed_message() {
        let odd = Error::template(ErrorCode::UNKNOWN, Status::new(500), "something else");
        assert_eq!(odd.message(), UNKNOWN_MESSAGE);
        assert_eq!(odd.render(), "unknown error[500][111111]");
    }

    #[test]
    fn nil_code_always_renders_ok() {
        let odd = Error::template(ErrorCode::NIL, Status::new(200), "fine");
        assert_eq!(odd.message(), "ok");
        assert_eq!(odd.render(), "ok");
    }

    // ========================================================================
    // Derivations
    // ========================================================================

    #[test]
    fn clone_with_origin_copies_classification() {
        let t = custom(7010, 503, "unavailable").clone_with_hint("retry in 5s");
        let err = t.clone_with_origin_error("socket closed");
        assert_eq!(err.code(), t.code());
        assert_eq!(err.status(), t.status());
        assert_eq!(err.message(), "unavailable");
        assert_eq!(err.hint(), "retry in 5s");
    }

    #[test]
    fn clone_with_origin_records_location() {
        let err = custom(7011, 500, "x").clone_with_origin_error("y");
        let origin = err.origin().unwrap();
        let location = origin.locations().next().unwrap();
        assert!(location.file().ends_with("error.rs"));
    }

    #[test]
    fn clone_with_origin_leaves_template_untouched() {
        let t = custom(7012, 500, "x");
        let _ = t.clone_with_origin_error("y");
        assert!(t.origin().is_none());
        assert_eq!(t.render(), "x[500][7012]");
    }

    #[test]
    fn clone_with_format_substitutes_and_keeps_template() {
        let t = custom(7020, 400, "failed a=%d");
        let err = t.clone_with_format(&[Arg::from(5)]);
        assert_eq!(err.message(), "failed a=5");
        assert_eq!(err.code(), t.code());
        assert_eq!(err.status(), t.status());
        assert_eq!(t.message(), "failed a=%d");
    }

    #[test]
    fn clone_with_format_keeps_existing_origin() {
        let t = custom(7021, 500, "step %s failed");
        let err = t
            .clone_with_origin_error("exit status 2")
            .clone_with_format(&[Arg::from("link")]);
        assert_eq!(err.render(), "step link failed[500][7021] (exit status 2)");
        assert_eq!(err.origin().unwrap().locations().count(), 2);
    }

    #[test]
    fn clone_with_format_marks_mismatch() {
        let t = custom(7022, 400, "a=%d");
        let err = t.clone_with_format(&[Arg::from("x")]);
        assert_eq!(err.message(), "a=%!d(string=x)");
    }

    #[test]
    fn clone_with_hint_sets_hint_and_keeps_template() {
        let t = custom(7030, 408, "timed out");
        let err = t.clone_with_hint("try again");
        assert_eq!(err.hint(), "try again");
        assert_eq!(t.hint(), "");
        assert_eq!(err.message(), "timed out");
        assert!(err.origin().is_none());
    }

    #[test]
    fn clone_with_hint_annotates_origin_chain() {
        let err = custom(7031, 408, "timed out")
            .clone_with_origin_error("deadline exceeded")
            .clone_with_hint("try again");
        assert_eq!(
            err.render(),
            "timed out[408][7031] (try again: deadline exceeded)"
        );
    }

    #[test]
    fn derivations_of_unknown_carry_fixed_message() {
        let err = definitions::UNKNOWN.clone_with_origin_error("weird");
        assert_eq!(err.message(), UNKNOWN_MESSAGE);
    }

    // ========================================================================
    // std integration
    // ========================================================================

    #[test]
    fn source_is_origin() {
        use std::error::Error as _;
        let t = custom(7040, 500, "x");
        assert!(t.source().is_none());
        let err = t.clone_with_origin_error("y");
        assert_eq!(err.source().unwrap().to_string(), "y");
    }

    #[test]
    fn errors_nest_as_origins() {
        let inner = custom(7041, 404, "not found").clone_with_origin_error("no row");
        let outer = custom(7042, 500, "load failed").clone_with_origin_error(inner);
        assert_eq!(
            outer.render(),
            "load failed[500][7042] (not found[404][7041] (no row))"
        );
        let root = outer.origin().unwrap().downcast_root::<Error>().unwrap();
        assert_eq!(root.code().value(), 7041);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_code_message_hint_only() {
        let err = custom(7044, 503, "busy")
            .clone_with_origin_error("queue full")
            .clone_with_hint("retry later");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":7044,"message":"busy","hint":"retry later"}"#);
    }

    #[test]
    fn debug_shows_fields() {
        let debug = format!("{:?}", custom(7043, 418, "teapot"));
        assert!(debug.contains("code: 7043"));
        assert!(debug.contains("status: 418"));
        assert!(debug.contains("\"teapot\""));
    }

    // ========================================================================
    // Concurrency
    // ========================================================================

    #[test]
    fn concurrent_derivations_are_independent() {
        let template = Arc::new(custom(7050, 500, "worker %d failed"));
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let template = Arc::clone(&template);
                thread::spawn(move || {
                    template
                        .clone_with_origin_error(format!("cause-{i}"))
                        .clone_with_format(&[Arg::from(i)])
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let err = handle.join().unwrap();
            assert_eq!(err.message(), format!("worker {i} failed"));
            assert_eq!(err.origin().unwrap().to_string(), format!("cause-{i}"));
        }
        assert_eq!(template.message(), "worker %d failed");
        assert!(template.origin().is_none());
    }
}

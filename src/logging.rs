//! Structured log view of an error.
//!
//! A [`LogRecord`] borrows every field a log line needs from an [`Error`]:
//! status, code, message, hint and the cause chain flattened into its
//! layers. It cannot outlive the error it was taken from, so loggers
//! consume it immediately instead of retaining references.
//!
//! Two ways out:
//!
//! - [`LogRecord::write_to`] writes a single `key='value'` line into any
//!   `fmt::Write`, truncating oversized fields.
//! - [`LogRecord::emit`] (feature `tracing`) sends the record as a `tracing`
//!   event: `error` level for 5xx statuses, `warn` otherwise.
//!
//! ```rust
//! use coded_errors::definitions;
//!
//! let err = definitions::TIMEOUT
//!     .clone_with_origin_error("deadline exceeded")
//!     .clone_with_hint("retry later");
//!
//! let mut line = String::new();
//! err.log_record().write_to(&mut line).unwrap();
//! assert!(line.starts_with(
//!     "[3] status=408 message='timeout' hint='retry later' origin='retry later: deadline exceeded' at="
//! ));
//! ```

use crate::origin::Layer;
use crate::{Error, ErrorCode, Status};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Maximum length for any individual field in formatted output.
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings.
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Borrowed, structured view of an [`Error`].
#[derive(Debug)]
pub struct LogRecord<'a> {
    error: &'a Error,
    status: Status,
    code: ErrorCode,
    message: &'a str,
    hint: &'a str,
    causes: SmallVec<[Cow<'a, str>; 4]>,
    locations: SmallVec<[&'static Location<'static>; 4]>,
}

impl Error {
    /// Structured view of this error for loggers.
    pub fn log_record(&self) -> LogRecord<'_> {
        let mut causes = SmallVec::new();
        let mut locations = SmallVec::new();
        if let Some(origin) = self.origin() {
            for layer in origin.layers() {
                match layer {
                    Layer::Stack(location) => locations.push(location),
                    Layer::Message(message) => causes.push(Cow::Borrowed(message)),
                    Layer::Root(root) => causes.push(Cow::Owned(root.to_string())),
                }
            }
        }
        LogRecord {
            error: self,
            status: self.status(),
            code: self.code(),
            message: self.message(),
            hint: self.hint(),
            causes,
            locations,
        }
    }

    /// Callback-style access to [`log_record`](Self::log_record).
    pub fn with_log_record<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&LogRecord<'_>) -> R,
    {
        f(&self.log_record())
    }
}

impl<'a> LogRecord<'a> {
    /// Transport status.
    #[inline]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Display message.
    #[inline]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    /// Display hint.
    #[inline]
    pub const fn hint(&self) -> &'a str {
        self.hint
    }

    /// Annotation messages followed by the root cause, outermost first.
    pub fn causes(&self) -> &[Cow<'a, str>] {
        &self.causes
    }

    /// Call sites recorded while the cause was attached, outermost first.
    pub fn locations(&self) -> &[&'static Location<'static>] {
        &self.locations
    }

    /// The error this record was taken from.
    #[inline]
    pub const fn error(&self) -> &'a Error {
        self.error
    }

    /// Write a single log line.
    ///
    /// Format: `[<code>] status=<status> message='..' hint='..' origin='..' at=file:line`
    /// with `origin` and `at` present only when a cause is attached. Each
    /// text field is capped at 1024 bytes.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] status={} message='{}' hint='{}'",
            self.code,
            self.status,
            truncate_with_indicator(self.message),
            truncate_with_indicator(self.hint)
        )?;

        if let Some(origin) = self.error.origin() {
            let rendered = origin.to_string();
            write!(f, " origin='{}'", truncate_with_indicator(&rendered))?;
        }

        for location in &self.locations {
            write!(f, " at={}:{}", location.file(), location.line())?;
        }

        Ok(())
    }

    /// Send this record as a `tracing` event.
    #[cfg(feature = "tracing")]
    pub fn emit(&self) {
        let origin = self.error.origin().map(|o| o.to_string());
        let at = self
            .locations
            .last()
            .map(|l| format!("{}:{}", l.file(), l.line()));

        if self.status.is_server_error() {
            tracing::error!(
                code = self.code.value(),
                status = self.status.value(),
                hint = self.hint,
                origin = origin.as_deref(),
                at = at.as_deref(),
                "{}",
                self.message
            );
        } else {
            tracing::warn!(
                code = self.code.value(),
                status = self.status.value(),
                hint = self.hint,
                origin = origin.as_deref(),
                at = at.as_deref(),
                "{}",
                self.message
            );
        }
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate a string for display to keep log lines bounded.
///
/// Returns a `Cow<str>` to avoid allocation when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

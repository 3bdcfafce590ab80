//! Convenience macros for defining templates and deriving errors.
//!
//! # Usage
//!
//! ```rust
//! use coded_errors::{define_templates, format_err, origin, ErrorCode};
//!
//! define_templates! {
//!     /// Upload exceeded the size limit.
//!     UPLOAD_TOO_LARGE = (ErrorCode::new(2001), 413, "upload of %d bytes exceeds %d"),
//!     UPLOAD_REJECTED  = (ErrorCode::new(2002), 422, "upload rejected"),
//! }
//!
//! let err = format_err!(UPLOAD_TOO_LARGE, 4096, 1024);
//! assert_eq!(err.to_string(), "upload of 4096 bytes exceeds 1024[413][2001]");
//!
//! let err = UPLOAD_REJECTED.clone_with_origin(Some(origin!("checksum {} mismatch", "ab12")));
//! assert_eq!(err.to_string(), "upload rejected[422][2002] (checksum ab12 mismatch)");
//! ```
//!
//! Templates defined this way are plain `static`s and are not checked for
//! code conflicts until they are handed to a [`Catalog`](crate::Catalog)
//! (see [`Catalog::insert`](crate::Catalog::insert)).

/// Define one `static` error template.
///
/// # Example
///
/// ```rust
/// # use coded_errors::{define_template, ErrorCode};
/// define_template!(
///     /// The cache is still warming up.
///     CACHE_COLD,
///     ErrorCode::new(3001),
///     503,
///     "cache not ready"
/// );
/// assert_eq!(CACHE_COLD.to_string(), "cache not ready[503][3001]");
/// ```
#[macro_export]
macro_rules! define_template {
    ($(#[$meta:meta])* $name:ident, $code:expr, $status:expr, $message:expr $(,)?) => {
        $(#[$meta])*
        pub static $name: $crate::Error =
            $crate::Error::template($code, $crate::Status::new($status), $message);
    };
}

/// Define several `static` error templates.
///
/// Each entry is `NAME = (code, status, message)`.
#[macro_export]
macro_rules! define_templates {
    { $( $(#[$meta:meta])* $name:ident = ($code:expr, $status:expr, $message:expr) ),+ $(,)? } => {
        $(
            $crate::define_template!($(#[$meta])* $name, $code, $status, $message);
        )+
    };
}

/// Derive an error from a template, filling its `%` verbs.
///
/// Shorthand for `template.clone_with_format(&[Arg::from(a), ...])`.
///
/// ```rust
/// # use coded_errors::{define_template, format_err, ErrorCode};
/// define_template!(MISSING_KEY, ErrorCode::new(1100), 400, "missing key %q in %s");
///
/// let path = String::from("/etc/app.toml");
/// let err = format_err!(MISSING_KEY, "port", &path);
/// assert_eq!(err.message(), "missing key \"port\" in /etc/app.toml");
/// ```
#[macro_export]
macro_rules! format_err {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $template.clone_with_format(&[$($crate::format::Arg::from($arg)),*])
    };
}

/// Build an [`Origin`](crate::Origin) from a format string, for causes that
/// are not already an error value.
#[macro_export]
macro_rules! origin {
    ($($arg:tt)+) => {
        $crate::Origin::msg(::std::format!($($arg)+))
    };
}

//! # Coded Errors
//!
//! Catalogued error values for services: every failure carries a stable
//! numeric code, a transport status, a message, an optional cause chain and
//! a display hint.
//!
//! ## Model
//!
//! 1. **Templates** are `static` or catalog-owned [`Error`] values. They are
//!    never mutated after creation.
//! 2. **Derivations** (`clone_with_origin_error`, `clone_with_format`,
//!    `clone_with_hint`) borrow a template and return an independent value.
//! 3. **Codes are unique** per [`Catalog`]; a conflicting registration is a
//!    programming error and aborts.
//! 4. **No error** is an explicit sentinel, [`definitions::NIL`], whose
//!    accessors are all defined.
//!
//! ## Quick Start
//!
//! ```rust
//! use coded_errors::{definitions, format_err, Catalog, ErrorCode, Result, Status};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     raw.parse::<u16>()
//!         .map_err(|e| definitions::BAD_FORMAT.clone_with_origin_error(e))
//! }
//!
//! let err = parse_port("http").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::BAD_FORMAT);
//! assert_eq!(err.to_string(), "bad format[400][1] (invalid digit found in string)");
//!
//! // Service-specific templates live in a catalog.
//! let mut catalog = Catalog::with_builtins();
//! let quota = catalog.register(ErrorCode::new(1001), Status::new(429), "quota of %d exceeded");
//! let err = format_err!(quota, 50).clone_with_hint("upgrade your plan");
//! assert_eq!(err.to_string(), "quota of 50 exceeded[429][1001]");
//! assert_eq!(err.hint(), "upgrade your plan");
//! ```
//!
//! ## Features
//!
//! - `serde` (default): `Error` serializes as `{"code", "message", "hint"}`.
//! - `tracing` (default): [`LogRecord::emit`] and catalog registration
//!   events go through `tracing`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod error;
pub mod format;
pub mod logging;
pub mod origin;

pub use catalog::{Catalog, CatalogError};
pub use codes::*;
pub use error::Error;
pub use logging::LogRecord;
pub use origin::{BoxError, Layer, Layers, Origin};

/// Type alias for Results using our error type.
pub type Result<T> = std::result::Result<T, Error>;

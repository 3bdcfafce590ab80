//! Conflict-checked registry of error templates.
//!
//! A [`Catalog`] maps each [`ErrorCode`] to exactly one template. It is
//! append-only: templates are inserted during start-up and never updated or
//! removed. A second template under an existing code is a bug in the
//! catalog definition, not a runtime condition, so [`Catalog::register`]
//! panics on it. [`Catalog::try_register`] reports it as a [`CatalogError`]
//! for callers that build catalogs from data.
//!
//! # Process-wide catalog
//!
//! Catalogs are ordinary values and can be built, passed around and tested
//! in isolation. One of them can be installed as the process-wide catalog
//! with [`Catalog::install`]; after that it is read-only. If nothing was
//! installed, [`Catalog::global`] installs the built-ins on first use.
//!
//! ```rust
//! use coded_errors::{Catalog, ErrorCode, Status};
//!
//! let mut catalog = Catalog::with_builtins();
//! let not_found = catalog.register(ErrorCode::new(1001), Status::new(404), "user %s not found");
//!
//! assert_eq!(catalog.get(ErrorCode::new(1001)).unwrap().message(), "user %s not found");
//! assert_eq!(not_found.to_string(), "user %s not found[404][1001]");
//! assert_eq!(catalog.len(), 6);
//! ```
//!
//! Duplicate codes abort:
//!
//! ```rust,should_panic
//! use coded_errors::{Catalog, ErrorCode, Status};
//!
//! let mut catalog = Catalog::with_builtins();
//! catalog.register(ErrorCode::TIMEOUT, Status::new(504), "gateway timeout"); // panics
//! ```

use crate::definitions::{self, BUILTINS};
use crate::{Error, ErrorCode, Status};
use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

/// Why a template could not be added to a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    /// A template is already registered under this code.
    DuplicateCode {
        /// The conflicting code.
        code: ErrorCode,
    },
    /// The code is reserved for the success sentinel.
    ReservedCode {
        /// The reserved code.
        code: ErrorCode,
    },
}

impl CatalogError {
    /// The code the failed registration used.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateCode { code } | Self::ReservedCode { code } => *code,
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCode { code } => write!(f, "conflicts error code: {code}"),
            Self::ReservedCode { code } => write!(f, "reserved error code: {code}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Append-only mapping from code to template.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: BTreeMap<ErrorCode, Error>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in templates, registered in
    /// [`BUILTINS`](crate::definitions::BUILTINS) order.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for template in BUILTINS {
            catalog.insert(template);
        }
        catalog
    }

    /// Create and register a template.
    ///
    /// # Panics
    ///
    /// If `code` is already registered or is [`ErrorCode::NIL`].
    #[track_caller]
    pub fn register(
        &mut self,
        code: ErrorCode,
        status: Status,
        message: impl Into<Cow<'static, str>>,
    ) -> Error {
        match self.try_register(code, status, message) {
            Ok(template) => template,
            Err(err) => abort_registration(err),
        }
    }

    /// Create and register a template, reporting conflicts as errors.
    pub fn try_register(
        &mut self,
        code: ErrorCode,
        status: Status,
        message: impl Into<Cow<'static, str>>,
    ) -> Result<Error, CatalogError> {
        let template = Error::from_parts(code, status, message.into());
        self.try_insert(&template).cloned()
    }

    /// Register an existing template value, such as a
    /// [`define_templates!`](crate::define_templates) static.
    ///
    /// # Panics
    ///
    /// If the template's code is already registered or is [`ErrorCode::NIL`].
    #[track_caller]
    pub fn insert(&mut self, template: &Error) -> &Error {
        match self.try_insert(template) {
            Ok(registered) => registered,
            Err(err) => abort_registration(err),
        }
    }

    /// Register an existing template value, reporting conflicts as errors.
    pub fn try_insert(&mut self, template: &Error) -> Result<&Error, CatalogError> {
        let code = template.code();
        if code.is_nil() {
            return Err(CatalogError::ReservedCode { code });
        }
        match self.templates.entry(code) {
            Entry::Occupied(_) => Err(CatalogError::DuplicateCode { code }),
            Entry::Vacant(slot) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    code = code.value(),
                    status = template.status().value(),
                    error_message = template.message(),
                    "registered error template"
                );
                Ok(slot.insert(template.clone()))
            }
        }
    }

    /// Template registered under `code`.
    pub fn get(&self, code: ErrorCode) -> Option<&Error> {
        self.templates.get(&code)
    }

    /// Template for a code read back from the wire.
    ///
    /// NIL resolves to the success sentinel and unregistered codes to
    /// [`UNKNOWN`](crate::definitions::UNKNOWN).
    pub fn resolve(&self, code: ErrorCode) -> &Error {
        if code.is_nil() {
            return &definitions::NIL;
        }
        self.get(code).unwrap_or(&definitions::UNKNOWN)
    }

    /// True when `code` is registered.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.templates.contains_key(&code)
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered templates in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &Error> + '_ {
        self.templates.values()
    }

    /// Registered codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = ErrorCode> + '_ {
        self.templates.keys().copied()
    }

    /// Make this the process-wide catalog.
    ///
    /// Succeeds once. Later calls, or calls after [`global`](Self::global)
    /// already installed the built-ins, hand the catalog back.
    pub fn install(self) -> Result<&'static Catalog, Catalog> {
        GLOBAL.set(self)?;
        Ok(Self::global())
    }

    /// The process-wide catalog, installing the built-ins if nothing was
    /// installed yet.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(Self::with_builtins)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Error;
    type IntoIter = std::collections::btree_map::Values<'a, ErrorCode, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.values()
    }
}

#[cold]
#[track_caller]
fn abort_registration(err: CatalogError) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(code = err.code().value(), error = %err, "error catalog misconfigured");
    panic!("{err}");
}

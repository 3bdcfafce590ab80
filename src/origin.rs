//! Cause chains attached to error values.
//!
//! An [`Origin`] is the root cause of an error plus the annotations stacked on
//! it while the error travelled up: call-site locations recorded when the
//! cause was attached, and explanatory messages added by hints.
//!
//! Annotations wrap, they never replace. Re-annotating an origin produces a
//! new outer layer that shares the inner chain through an `Arc`, so deriving
//! from a shared template never touches the template's own chain.
//!
//! # Rendering
//!
//! - Stack layers are transparent in `{}`; `{:#}` appends `at file:line:col`
//!   for each of them, innermost first.
//! - Message layers render as `"<message>: <cause>"`.
//!
//! ```rust
//! use coded_errors::Origin;
//! use std::panic::Location;
//!
//! let origin = Origin::msg("connection refused")
//!     .with_stack(Location::caller())
//!     .with_message("is the daemon running?");
//!
//! assert_eq!(origin.to_string(), "is the daemon running?: connection refused");
//! assert_eq!(origin.root().to_string(), "connection refused");
//! assert_eq!(origin.locations().count(), 1);
//! ```

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Boxed, thread-safe error accepted as a root cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Root cause plus its annotation layers.
#[derive(Clone)]
pub struct Origin {
    node: Arc<Node>,
}

enum Node {
    Root(BoxError),
    Stack {
        location: &'static Location<'static>,
        cause: Origin,
    },
    Message {
        message: Cow<'static, str>,
        cause: Origin,
    },
}

/// One layer of an origin chain, outermost first.
#[derive(Debug, Clone, Copy)]
pub enum Layer<'a> {
    /// Call site recorded when the cause was attached or re-attached.
    Stack(&'static Location<'static>),
    /// Explanatory message wrapped around the cause.
    Message(&'a str),
    /// The underlying error.
    Root(&'a (dyn StdError + Send + Sync + 'static)),
}

impl Origin {
    /// Start a chain from an existing error.
    pub fn new(cause: impl Into<BoxError>) -> Self {
        Self::from_node(Node::Root(cause.into()))
    }

    /// Start a chain from a bare message.
    pub fn msg(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(message.into().into_owned())
    }

    #[inline]
    fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Record a call-site location on top of this chain.
    #[must_use]
    pub fn with_stack(self, location: &'static Location<'static>) -> Self {
        Self::from_node(Node::Stack {
            location,
            cause: self,
        })
    }

    /// Record the caller's location on top of this chain.
    #[must_use]
    #[track_caller]
    pub fn here(self) -> Self {
        self.with_stack(Location::caller())
    }

    /// Wrap this chain with an explanatory message.
    #[must_use]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_node(Node::Message {
            message: message.into(),
            cause: self,
        })
    }

    /// Walk the layers, outermost first, ending with the root.
    pub fn layers(&self) -> Layers<'_> {
        Layers { next: Some(self) }
    }

    /// The innermost error the chain was started from.
    pub fn root(&self) -> &(dyn StdError + Send + Sync + 'static) {
        let mut current = self;
        loop {
            match &*current.node {
                Node::Root(err) => return err.as_ref(),
                Node::Stack { cause, .. } | Node::Message { cause, .. } => current = cause,
            }
        }
    }

    /// Recorded call sites, outermost first.
    pub fn locations(&self) -> impl Iterator<Item = &'static Location<'static>> + '_ {
        self.layers().filter_map(|layer| match layer {
            Layer::Stack(location) => Some(location),
            _ => None,
        })
    }

    /// Annotation messages, outermost first.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers().filter_map(|layer| match layer {
            Layer::Message(message) => Some(message),
            _ => None,
        })
    }

    /// Try to view the root cause as a concrete error type.
    pub fn downcast_root<E: StdError + 'static>(&self) -> Option<&E> {
        self.root().downcast_ref::<E>()
    }
}

/// Iterator over the layers of an [`Origin`].
pub struct Layers<'a> {
    next: Option<&'a Origin>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = Layer<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        match &*current.node {
            Node::Root(err) => Some(Layer::Root(err.as_ref())),
            Node::Stack { location, cause } => {
                self.next = Some(cause);
                Some(Layer::Stack(*location))
            }
            Node::Message { message, cause } => {
                self.next = Some(cause);
                Some(Layer::Message(message.as_ref()))
            }
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.node {
            Node::Root(err) => write!(f, "{err}"),
            Node::Stack { location, cause } => {
                fmt::Display::fmt(cause, f)?;
                if f.alternate() {
                    write!(
                        f,
                        "\n    at {}:{}:{}",
                        location.file(),
                        location.line(),
                        location.column()
                    )?;
                }
                Ok(())
            }
            Node::Message { message, cause } => {
                write!(f, "{message}: ")?;
                fmt::Display::fmt(cause, f)
            }
        }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.layers()).finish()
    }
}

impl StdError for Origin {
    // Annotation layers are part of this error's own rendering; the next
    // error in the chain is whatever the root reports.
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.root().source()
    }
}

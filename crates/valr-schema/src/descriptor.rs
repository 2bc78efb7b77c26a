//! # Descriptors
//!
//! A descriptor is one immutable constraint on a schema: either a typed
//! constraint from the schema's vocabulary (with an optional message
//! override) or a custom validator closure. Schemas only ever append
//! descriptors; nothing rewrites one after it is created.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use valr_core::SchemaType;

/// What a message function sees when it builds a message.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    /// Schema type that owns the failing descriptor.
    pub schema: SchemaType,
    /// Constraint kind, e.g. `"min"`.
    pub kind: &'a str,
    /// Constraint parameters, `Null` when the kind has none.
    pub value: &'a Value,
}

/// Signature of a message function.
pub type MessageFn = Arc<dyn Fn(&MessageContext<'_>) -> String + Send + Sync>;

/// Per-descriptor message override.
#[derive(Clone)]
pub enum Message {
    /// Returned verbatim; no template substitution.
    Literal(String),
    /// Called with the failing descriptor's context.
    Func(MessageFn),
}

impl Message {
    /// Build a function message.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&MessageContext<'_>) -> String + Send + Sync + 'static,
    {
        Message::Func(Arc::new(f))
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Literal(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Literal(s)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Message::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// One constraint in a schema type's vocabulary.
///
/// `test` receives the coerced value and the untouched raw input.
pub trait Constraint<T>: fmt::Debug + Send + Sync + 'static {
    /// Kind tag; also the second segment of the message key.
    fn kind(&self) -> &'static str;

    /// Parameters used for template substitution.
    fn params(&self) -> Value;

    /// Whether `value` satisfies the constraint.
    fn test(&self, value: &T, input: &Value) -> bool;
}

/// Custom validator: `(coerced, raw) -> Some(message)` on failure.
pub type CustomFn<T> = Arc<dyn Fn(&T, &Value) -> Option<String> + Send + Sync>;

/// An immutable constraint record.
pub enum Descriptor<T, C> {
    /// A closure that reports its own message.
    Custom(CustomFn<T>),
    /// A typed constraint with an optional message override.
    Check {
        /// The constraint.
        constraint: C,
        /// Override for the table-derived message.
        message: Option<Message>,
    },
}

impl<T, C: Constraint<T>> Descriptor<T, C> {
    /// Kind tag (`"custom"` for closures).
    pub fn kind(&self) -> &'static str {
        match self {
            Descriptor::Custom(_) => "custom",
            Descriptor::Check { constraint, .. } => constraint.kind(),
        }
    }
}

impl<T, C: fmt::Debug> fmt::Debug for Descriptor<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Custom(_) => f.write_str("Custom(..)"),
            Descriptor::Check { constraint, message } => f
                .debug_struct("Check")
                .field("constraint", constraint)
                .field("message", message)
                .finish(),
        }
    }
}

//! Array schemas.
//!
//! Only array-shaped inputs pass the type check; nothing is coerced into an
//! array. Element comparisons treat numbers by value, so `1` and `1.0` are
//! the same element.

use serde_json::{json, Value};
use valr_core::SchemaType;

use crate::descriptor::{Constraint, Message};
use crate::kind::SchemaKind;
use crate::pipeline::same_value;
use crate::schema::Schema;

/// Marker for array schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayKind;

/// An array schema.
pub type ArraySchema = Schema<ArrayKind>;

/// The array constraint vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayConstraint {
    /// At least this many elements.
    Min(usize),
    /// At most this many elements.
    Max(usize),
    /// Element count within the bounds, inclusive.
    Range(usize, usize),
    /// Exactly this many elements.
    Len(usize),
    /// Every listed value is an element.
    Includes(Vec<Value>),
    /// No listed value is an element.
    Excludes(Vec<Value>),
    /// No element appears twice.
    Unique,
}

impl SchemaKind for ArrayKind {
    type Value = Vec<Value>;
    type Constraint = ArrayConstraint;
    const TYPE: SchemaType = SchemaType::Array;

    fn coerce(input: &Value) -> Option<Vec<Value>> {
        input.as_array().cloned()
    }
}

fn contains(items: &[Value], needle: &Value) -> bool {
    items.iter().any(|item| same_value(item, needle))
}

impl Constraint<Vec<Value>> for ArrayConstraint {
    fn kind(&self) -> &'static str {
        match self {
            ArrayConstraint::Min(_) => "min",
            ArrayConstraint::Max(_) => "max",
            ArrayConstraint::Range(..) => "range",
            ArrayConstraint::Len(_) => "len",
            ArrayConstraint::Includes(_) => "includes",
            ArrayConstraint::Excludes(_) => "excludes",
            ArrayConstraint::Unique => "unique",
        }
    }

    fn params(&self) -> Value {
        match self {
            ArrayConstraint::Min(n) | ArrayConstraint::Max(n) | ArrayConstraint::Len(n) => json!(n),
            ArrayConstraint::Range(min, max) => json!([min, max]),
            // Wrapped so `{0}` renders the whole list.
            ArrayConstraint::Includes(values) | ArrayConstraint::Excludes(values) => {
                json!([values])
            }
            ArrayConstraint::Unique => Value::Null,
        }
    }

    fn test(&self, value: &Vec<Value>, _input: &Value) -> bool {
        match self {
            ArrayConstraint::Min(n) => value.len() >= *n,
            ArrayConstraint::Max(n) => value.len() <= *n,
            ArrayConstraint::Range(min, max) => (*min..=*max).contains(&value.len()),
            ArrayConstraint::Len(n) => value.len() == *n,
            ArrayConstraint::Includes(wanted) => wanted.iter().all(|v| contains(value, v)),
            ArrayConstraint::Excludes(banned) => !banned.iter().any(|v| contains(value, v)),
            ArrayConstraint::Unique => value
                .iter()
                .enumerate()
                .all(|(i, item)| !contains(&value[..i], item)),
        }
    }
}

impl Schema<ArrayKind> {
    /// At least `n` elements.
    pub fn min(self, n: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(ArrayConstraint::Min(n), message)
    }

    /// At most `n` elements.
    pub fn max(self, n: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(ArrayConstraint::Max(n), message)
    }

    /// Between `min` and `max` elements, inclusive.
    pub fn range(self, min: usize, max: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(ArrayConstraint::Range(min, max), message)
    }

    /// Exactly `n` elements.
    pub fn len(self, n: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(ArrayConstraint::Len(n), message)
    }

    /// Every value in `values` is an element (SameValueZero).
    pub fn includes(
        self,
        values: impl IntoIterator<Item = Value>,
        message: impl Into<Option<Message>>,
    ) -> Self {
        self.push_check(ArrayConstraint::Includes(values.into_iter().collect()), message)
    }

    /// No value in `values` is an element.
    pub fn excludes(
        self,
        values: impl IntoIterator<Item = Value>,
        message: impl Into<Option<Message>>,
    ) -> Self {
        self.push_check(ArrayConstraint::Excludes(values.into_iter().collect()), message)
    }

    /// No duplicate elements.
    pub fn unique(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(ArrayConstraint::Unique, message)
    }
}

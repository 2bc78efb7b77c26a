//! # Validation Pipeline
//!
//! `evaluate(descriptors, raw) -> Option<message>`, in strict order:
//!
//! 1. **Optional check.** If an optional matcher is set and matches the raw
//!    input, the value passes. Nothing else runs, not even the type check.
//! 2. **Coercion.** The raw input is converted once to the declared type.
//!    A failed conversion reports the `types.<type>` message and stops.
//! 3. **Descriptors.** Each descriptor runs in declaration order against
//!    the coerced value. The first failure is the result.
//!
//! Declaration order is priority order. Panics raised inside custom
//! validators or constraints are not caught.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use valr_core::Messages;

use crate::descriptor::{Constraint, Descriptor};
use crate::kind::{KindDescriptor, SchemaKind};
use crate::resolve;

/// Decides which raw inputs bypass validation entirely.
#[derive(Clone)]
pub enum Optional {
    /// Inputs equal to any listed value are skipped.
    Whitelist(Vec<Value>),
    /// Inputs for which the predicate returns `true` are skipped.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Optional {
    /// The default whitelist: empty string and null.
    pub fn default_whitelist() -> Self {
        Optional::Whitelist(vec![Value::String(String::new()), Value::Null])
    }

    /// Whether `input` bypasses validation.
    pub fn matches(&self, input: &Value) -> bool {
        match self {
            Optional::Whitelist(values) => values.iter().any(|v| same_value(v, input)),
            Optional::Predicate(f) => f(input),
        }
    }
}

impl fmt::Debug for Optional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optional::Whitelist(values) => f.debug_tuple("Whitelist").field(values).finish(),
            Optional::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Whitelist equality: numbers compare by value (`1 == 1.0`), everything
/// else structurally.
pub(crate) fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Everything a compiled rule needs to run the pipeline later.
pub struct Evaluator<K> {
    messages: Messages,
    optional: Option<Optional>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for Evaluator<K> {
    fn clone(&self) -> Self {
        Self {
            messages: self.messages.clone(),
            optional: self.optional.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: SchemaKind> Evaluator<K> {
    /// Build an evaluator over a message table and optional matcher.
    pub fn new(messages: Messages, optional: Option<Optional>) -> Self {
        Self {
            messages,
            optional,
            _kind: PhantomData,
        }
    }

    /// Run `descriptors` against `input`.
    pub fn evaluate(&self, descriptors: &[Arc<KindDescriptor<K>>], input: &Value) -> Option<String> {
        if self.optional.as_ref().is_some_and(|o| o.matches(input)) {
            return None;
        }

        let Some(value) = K::coerce(input) else {
            tracing::trace!(schema = %K::TYPE, "input failed type coercion");
            return Some(resolve::type_failure(K::TYPE, &self.messages));
        };

        descriptors
            .iter()
            .find_map(|descriptor| self.run_one(descriptor, &value, input))
    }

    fn run_one(
        &self,
        descriptor: &KindDescriptor<K>,
        value: &K::Value,
        input: &Value,
    ) -> Option<String> {
        match descriptor {
            Descriptor::Custom(validator) => {
                let message = validator(value, input).filter(|m| !m.is_empty())?;
                tracing::trace!(schema = %K::TYPE, kind = "custom", "constraint failed");
                Some(message)
            }
            Descriptor::Check {
                constraint,
                message,
            } => {
                if constraint.test(value, input) {
                    return None;
                }
                tracing::trace!(schema = %K::TYPE, kind = constraint.kind(), "constraint failed");
                Some(resolve::resolve::<K::Value, _>(
                    K::TYPE,
                    constraint,
                    message.as_ref(),
                    &self.messages,
                ))
            }
        }
    }
}

//! The seam between the generic engine and a concrete schema type.
//!
//! A [`SchemaKind`] names the coerced value type, the constraint vocabulary,
//! and the coercion step. Everything else (descriptor storage, the pipeline,
//! compilation, adapters) is written once against this trait.

use serde_json::Value;
use valr_core::SchemaType;

use crate::descriptor::{Constraint, Descriptor};

/// A concrete schema type: `string`, `number`, or `array`.
pub trait SchemaKind: Send + Sync + 'static {
    /// The value every constraint of this kind is tested against.
    type Value: Send + Sync + 'static;

    /// The constraint vocabulary.
    type Constraint: Constraint<Self::Value>;

    /// Type tag reported in rule metadata and message keys.
    const TYPE: SchemaType;

    /// Convert a raw input to [`Self::Value`]. `None` is a type failure.
    fn coerce(input: &Value) -> Option<Self::Value>;
}

/// Descriptor specialised to a schema kind.
pub type KindDescriptor<K> =
    Descriptor<<K as SchemaKind>::Value, <K as SchemaKind>::Constraint>;

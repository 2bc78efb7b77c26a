//! # valr-schema: The Validation Engine
//!
//! Builds typed constraint chains for string, number, and array values and
//! compiles them into rules that form-validation runners consume.
//!
//! ## Responsibilities
//!
//! - **Descriptors:** each builder call appends one immutable descriptor
//!   ([`descriptor`]); `concat` and `required` interleave raw rules.
//!
//! - **Pipeline:** optional short-circuit, one central coercion to the
//!   declared type, then first-failure-wins evaluation in declaration order
//!   ([`pipeline`]).
//!
//! - **Messages:** function override, then literal override, then the
//!   shared table rendered with the descriptor's parameters ([`resolve`]).
//!
//! - **Compilation:** every maximal run of descriptors becomes one compiled
//!   rule; raw rules pass through in place ([`compile`]).
//!
//! - **Adapters:** compiled rules translate to shape A ([`FormRule`]) or
//!   shape B ([`TriggerRule`]) ([`adapter`]).
//!
//! - **Extensions:** methods registered at runtime and dispatched with
//!   [`Schema::invoke`] ([`extension`]).
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use valr_schema::Valr;
//!
//! let valr = Valr::new();
//! let name = valr.string().required(None).min(3, None).max(5, None);
//!
//! assert_eq!(name.check(&json!("")).as_deref(), Some("必填"));
//! assert_eq!(name.check(&json!("ab")).as_deref(), Some("字符串长度最小值为 3"));
//! assert_eq!(name.check(&json!("abc")), None);
//! ```
//!
//! [`FormRule`]: valr_core::FormRule
//! [`TriggerRule`]: valr_core::TriggerRule

pub mod adapter;
pub mod any;
pub mod array;
pub mod compile;
pub mod descriptor;
pub mod document;
pub mod extension;
pub mod kind;
pub mod number;
pub mod pipeline;
pub mod resolve;
pub mod runner;
pub mod schema;
pub mod string;
pub mod valr;

// Re-export primary types for ergonomic imports.
pub use adapter::{schema_to_rules, schema_to_trigger_rules, to_form_rule, to_trigger_rule};
pub use any::AnySchema;
pub use array::{ArrayConstraint, ArrayKind, ArraySchema};
pub use compile::{CompiledRule, Rule, RuleShape};
pub use descriptor::{Constraint, Descriptor, Message, MessageContext};
pub use document::{OptionalSpec, RuleSpec, SchemaDocument};
pub use extension::{ExtensionFn, ExtensionRegistry, Extensions};
pub use kind::SchemaKind;
pub use number::{NumberConstraint, NumberKind, NumberSchema};
pub use pipeline::Optional;
pub use runner::{FormRunner, Outcome};
pub use schema::Schema;
pub use string::{StringConstraint, StringKind, StringSchema};
pub use valr::Valr;

pub use valr_core::{
    FormRule, MessageTable, Messages, RuleError, SchemaType, Trigger, TriggerRule,
};
pub use valr_predicates::{IpVersion, PasswordOptions};

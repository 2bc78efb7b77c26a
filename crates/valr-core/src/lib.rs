#![deny(missing_docs)]

//! # valr-core: Foundational Types for valr
//!
//! This crate holds everything the validation engine and its consumers
//! share. It depends on nothing internal; `valr-schema` and `valr-cli`
//! build on top of it.
//!
//! ## Key Design Principles
//!
//! 1. **One raw input model.** Every raw value is a `serde_json::Value`.
//!    `Null` covers both "null" and "absent". Conversions to the declared
//!    schema type live in [`coerce`] and follow ECMAScript semantics so that
//!    form inputs behave the same way they do in a browser.
//!
//! 2. **Explicit message table.** [`Messages`] is a shared, reference-counted
//!    handle threaded through schema construction. Overrides are applied
//!    with a per-key recursive merge; nothing mutates ambient global state.
//!
//! 3. **Lenient templates.** [`template::render`] never fails: unknown
//!    placeholders are left verbatim.
//!
//! 4. **Two rule shapes, one meaning.** [`FormRule`] (callback with a plain
//!    message) and [`TriggerRule`] (callback with an Error-like value and a
//!    trigger) are the only shapes exposed to form runners.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `valr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests. Literal regex patterns
//!   are the only `expect` calls.

pub mod coerce;
pub mod error;
pub mod kind;
pub mod messages;
pub mod rule;
pub mod template;

// Re-export primary types for ergonomic imports.
pub use error::{ConfigError, DocumentError, RegistryError, ValrError};
pub use kind::SchemaType;
pub use messages::{MessageTable, Messages};
pub use rule::{
    FormRule, FormValidator, RuleError, RuleMeta, Trigger, TriggerRule, TriggerValidator,
};

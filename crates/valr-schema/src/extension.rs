//! # Extension Registry
//!
//! Runtime-added validation methods. An extension is a predicate over the
//! raw input and the arguments given at the call site; it returns a message
//! on failure. Calling [`Schema::invoke`](crate::Schema::invoke) appends a
//! custom descriptor that runs the predicate.
//!
//! ## Collisions
//!
//! Installing is explicit about collisions:
//!
//! - Names of built-in builder methods (and their document kind aliases)
//!   are reserved: [`RegistryError::ReservedName`].
//! - A second `add` of the same name for the same type is rejected:
//!   [`RegistryError::DuplicateMethod`].
//! - [`ExtensionRegistry::replace`] overrides on purpose and logs a warning.
//!
//! The registry is shared by a [`Valr`](crate::Valr) and every schema it
//! creates.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use valr_core::{RegistryError, SchemaType};

/// Extension predicate: `(raw_input, args) -> Some(message)` on failure.
pub type ExtensionFn = Arc<dyn Fn(&Value, &[Value]) -> Option<String> + Send + Sync>;

const COMMON_METHODS: &[&str] = &[
    "custom",
    "required",
    "optional",
    "optional_values",
    "optional_if",
    "concat",
    "invoke",
];

const STRING_METHODS: &[&str] = &[
    "min",
    "max",
    "range",
    "len",
    "byte_len",
    "byteLen",
    "equal",
    "contain",
    "starts_with",
    "startsWith",
    "ends_with",
    "endsWith",
    "regex",
    "uppercase",
    "lowercase",
    "alphanumeric",
    "phone",
    "email",
    "url",
    "ip",
    "password",
];

const NUMBER_METHODS: &[&str] = &[
    "min",
    "max",
    "range",
    "gt",
    "gte",
    "lt",
    "lte",
    "equal",
    "integer",
    "decimal",
    "positive",
    "negative",
    "nonnegative",
    "nonpositive",
    "port",
];

const ARRAY_METHODS: &[&str] = &["min", "max", "range", "len", "includes", "excludes", "unique"];

/// Built-in method names of a schema type, common methods excluded.
pub fn builtin_methods(schema: SchemaType) -> &'static [&'static str] {
    match schema {
        SchemaType::String => STRING_METHODS,
        SchemaType::Number => NUMBER_METHODS,
        SchemaType::Array => ARRAY_METHODS,
    }
}

/// Whether `name` is a built-in method of `schema`.
pub fn is_builtin(schema: SchemaType, name: &str) -> bool {
    COMMON_METHODS.contains(&name) || builtin_methods(schema).contains(&name)
}

/// Extension methods keyed by schema type and name.
#[derive(Default)]
pub struct ExtensionRegistry {
    methods: HashMap<(SchemaType, String), ExtensionFn>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new method. Built-in and already registered names are
    /// rejected.
    pub fn add(
        &mut self,
        schema: SchemaType,
        name: &str,
        predicate: ExtensionFn,
    ) -> Result<(), RegistryError> {
        if is_builtin(schema, name) {
            return Err(RegistryError::ReservedName {
                schema,
                name: name.to_string(),
            });
        }
        let key = (schema, name.to_string());
        if self.methods.contains_key(&key) {
            return Err(RegistryError::DuplicateMethod {
                schema,
                name: name.to_string(),
            });
        }
        tracing::debug!(%schema, name, "extension method added");
        self.methods.insert(key, predicate);
        Ok(())
    }

    /// Install or override a method. Returns `true` if one was replaced.
    /// Built-in names stay reserved.
    pub fn replace(
        &mut self,
        schema: SchemaType,
        name: &str,
        predicate: ExtensionFn,
    ) -> Result<bool, RegistryError> {
        if is_builtin(schema, name) {
            return Err(RegistryError::ReservedName {
                schema,
                name: name.to_string(),
            });
        }
        let replaced = self.methods.insert((schema, name.to_string()), predicate).is_some();
        if replaced {
            tracing::warn!(%schema, name, "extension method replaced");
        }
        Ok(replaced)
    }

    /// Look up a method.
    pub fn get(&self, schema: SchemaType, name: &str) -> Option<ExtensionFn> {
        self.methods.get(&(schema, name.to_string())).cloned()
    }

    /// Registered names for `schema`, sorted.
    pub fn names(&self, schema: SchemaType) -> Vec<String> {
        let mut names: Vec<String> = self
            .methods
            .keys()
            .filter(|(ty, _)| *ty == schema)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.methods.keys().collect();
        keys.sort();
        f.debug_struct("ExtensionRegistry").field("methods", &keys).finish()
    }
}

/// Shared handle to an [`ExtensionRegistry`].
#[derive(Clone, Default, Debug)]
pub struct Extensions {
    inner: Arc<RwLock<ExtensionRegistry>>,
}

impl Extensions {
    /// A handle to a fresh, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`ExtensionRegistry::add`].
    pub fn add<F>(&self, schema: SchemaType, name: &str, predicate: F) -> Result<(), RegistryError>
    where
        F: Fn(&Value, &[Value]) -> Option<String> + Send + Sync + 'static,
    {
        self.inner.write().add(schema, name, Arc::new(predicate))
    }

    /// See [`ExtensionRegistry::replace`].
    pub fn replace<F>(
        &self,
        schema: SchemaType,
        name: &str,
        predicate: F,
    ) -> Result<bool, RegistryError>
    where
        F: Fn(&Value, &[Value]) -> Option<String> + Send + Sync + 'static,
    {
        self.inner.write().replace(schema, name, Arc::new(predicate))
    }

    /// Look up a method, failing with [`RegistryError::UnknownMethod`].
    pub fn get(&self, schema: SchemaType, name: &str) -> Result<ExtensionFn, RegistryError> {
        self.inner
            .read()
            .get(schema, name)
            .ok_or_else(|| RegistryError::UnknownMethod {
                schema,
                name: name.to_string(),
            })
    }

    /// Whether `name` is registered for `schema`.
    pub fn contains(&self, schema: SchemaType, name: &str) -> bool {
        self.inner.read().get(schema, name).is_some()
    }

    /// Registered names for `schema`, sorted.
    pub fn names(&self, schema: SchemaType) -> Vec<String> {
        self.inner.read().names(schema)
    }
}

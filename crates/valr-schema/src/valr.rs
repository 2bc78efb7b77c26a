//! The schema factory.
//!
//! A [`Valr`] owns one message table and one extension registry. Every
//! schema it creates shares both, so `set_messages` and `add_method` take
//! effect for all of them, including rules compiled earlier.

use serde_json::Value;
use valr_core::{ConfigError, MessageTable, Messages, RegistryError, SchemaType};

use crate::array::ArraySchema;
use crate::extension::Extensions;
use crate::number::NumberSchema;
use crate::schema::Schema;
use crate::string::StringSchema;

/// Factory for schemas sharing one message table and extension registry.
#[derive(Debug, Clone, Default)]
pub struct Valr {
    messages: Messages,
    extensions: Extensions,
}

impl Valr {
    /// A factory over the built-in message table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory over an existing message handle.
    pub fn with_messages(messages: Messages) -> Self {
        Self {
            messages,
            extensions: Extensions::new(),
        }
    }

    /// A new, empty string schema.
    pub fn string(&self) -> StringSchema {
        Schema::new(self.messages.clone(), self.extensions.clone())
    }

    /// A new, empty number schema.
    pub fn number(&self) -> NumberSchema {
        Schema::new(self.messages.clone(), self.extensions.clone())
    }

    /// A new, empty array schema.
    pub fn array(&self) -> ArraySchema {
        Schema::new(self.messages.clone(), self.extensions.clone())
    }

    /// Deep-merge a partial table (flat dotted or nested keys).
    pub fn set_messages(&self, partial: Value) -> Result<(), ConfigError> {
        self.messages.merge(partial)
    }

    /// Deep-merge an already loaded table.
    pub fn merge_messages(&self, partial: MessageTable) {
        self.messages.merge_table(partial);
    }

    /// Install an extension method. See [`Extensions::add`].
    pub fn add_method<F>(&self, schema: SchemaType, name: &str, predicate: F) -> Result<(), RegistryError>
    where
        F: Fn(&Value, &[Value]) -> Option<String> + Send + Sync + 'static,
    {
        self.extensions.add(schema, name, predicate)
    }

    /// Install or override an extension method. See [`Extensions::replace`].
    pub fn replace_method<F>(
        &self,
        schema: SchemaType,
        name: &str,
        predicate: F,
    ) -> Result<bool, RegistryError>
    where
        F: Fn(&Value, &[Value]) -> Option<String> + Send + Sync + 'static,
    {
        self.extensions.replace(schema, name, predicate)
    }

    /// The shared message table.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// The shared extension registry.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

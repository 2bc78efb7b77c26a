//! # Error Types: Structured Error Hierarchy
//!
//! Library-level failures for valr. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A value failing validation is NOT an error. The engine reports it as
//!   `Option<String>`; nothing in this module describes a rejected input.
//! - Configuration errors name the source (file path or format) and the
//!   reason the table could not be loaded.
//! - Registry errors name the schema type and the method involved.

use thiserror::Error;

use crate::kind::SchemaType;

/// Top-level error type for valr.
#[derive(Error, Debug)]
pub enum ValrError {
    /// The message table could not be loaded or merged.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An extension method could not be installed or invoked.
    #[error("extension registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A schema document could not be turned into a schema.
    #[error("schema document error: {0}")]
    Document(#[from] DocumentError),
}

/// Error while loading or merging message configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read message file '{path}': {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// JSON configuration failed to parse.
    #[error("invalid JSON message table: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration failed to parse.
    #[error("invalid YAML message table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed, but its root is not a mapping.
    #[error("message table root must be a mapping, found {found}")]
    NotAMapping {
        /// JSON type name of the root value that was found.
        found: &'static str,
    },
}

/// Error in the extension method registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name belongs to a built-in builder method.
    #[error("'{name}' is a built-in {schema} method and cannot be redefined")]
    ReservedName {
        /// Schema type the installation targeted.
        schema: SchemaType,
        /// Rejected method name.
        name: String,
    },

    /// An extension with this name is already installed.
    #[error("{schema} method '{name}' is already registered; use replace_method to override it")]
    DuplicateMethod {
        /// Schema type the installation targeted.
        schema: SchemaType,
        /// Colliding method name.
        name: String,
    },

    /// No extension with this name exists for the schema type.
    #[error("{schema} schema has no method '{name}'")]
    UnknownMethod {
        /// Schema type the call targeted.
        schema: SchemaType,
        /// Method name that was not found.
        name: String,
    },
}

/// Error while building a schema from a declarative document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A rule parameter has the wrong shape for its kind.
    #[error("{schema}.{kind}: invalid parameter: {reason}")]
    InvalidParameter {
        /// Schema type of the document.
        schema: SchemaType,
        /// Constraint kind whose parameter was rejected.
        kind: String,
        /// What was expected.
        reason: String,
    },

    /// A `regex` rule carried a pattern that does not compile.
    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A rule had neither a `kind` nor any raw-rule field.
    #[error("rule #{index} has no kind and no raw-rule fields")]
    EmptyRule {
        /// Position of the rule inside the document.
        index: usize,
    },

    /// The document could not be parsed.
    #[error("cannot parse schema document: {0}")]
    Parse(String),
}

//! # Schema Type Tags
//!
//! The three value types a schema can declare. The tag is immutable for the
//! lifetime of a schema and doubles as the first segment of message keys
//! (`"<type>.<kind>"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared value type of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Text values. Every raw input converts to a string.
    String,
    /// Numeric values. Raw inputs that convert to NaN are rejected.
    Number,
    /// Sequences. Only array-shaped raw inputs are accepted.
    Array,
}

impl SchemaType {
    /// All schema types, in declaration order.
    pub const ALL: [SchemaType; 3] = [SchemaType::String, SchemaType::Number, SchemaType::Array];

    /// The lowercase tag used in message keys and documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Array => "array",
        }
    }

    /// Message-table key reported when a raw input is not of this type.
    ///
    /// Strings never fail their type check, but the key is still defined so
    /// every type resolves uniformly.
    pub fn type_message_key(&self) -> String {
        format!("types.{}", self.as_str())
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SchemaType::String),
            "number" => Ok(SchemaType::Number),
            "array" => Ok(SchemaType::Array),
            other => Err(format!(
                "unknown schema type '{other}'; expected one of: string, number, array"
            )),
        }
    }
}

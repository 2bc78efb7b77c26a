//! # Schema Documents
//!
//! A declarative, serde-deserialisable description of one schema, used by
//! the `valr` playground and by hosts that keep field rules in config.
//!
//! ```yaml
//! type: string
//! optional: true
//! rules:
//!   - kind: min
//!     value: 3
//!   - kind: email
//!     message: 邮箱不对
//!   - required: true
//!     message: 必填
//!   - kind: forbidden        # a registered extension
//!     value: [admin]
//! ```
//!
//! A rule with a `kind` maps to the builder method of that name (document
//! kinds use the message-key spelling, e.g. `byteLen`; the snake_case form
//! is accepted too). Kinds that are not built in are invoked as extension
//! methods. A rule without a `kind` is a raw rule built from its `required`,
//! `message`, `type`, `min`, and `max` fields. Combining a `kind` with any
//! raw-rule field other than `message` is an error.
//!
//! `optional` is `true` for the default whitelist, or a list of values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use valr_core::{DocumentError, FormRule, SchemaType, ValrError};
use valr_predicates::{IpVersion, PasswordOptions};

use crate::any::AnySchema;
use crate::array::ArrayKind;
use crate::descriptor::Message;
use crate::extension;
use crate::kind::SchemaKind;
use crate::number::NumberKind;
use crate::schema::Schema;
use crate::string::StringKind;
use crate::valr::Valr;

/// A declarative schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Declared type.
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Inputs that bypass validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<OptionalSpec>,
    /// Rules, in priority order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// `optional: true` or `optional: [values…]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionalSpec {
    /// `true` enables the default whitelist; `false` leaves the field
    /// non-optional.
    Enabled(bool),
    /// An explicit whitelist.
    Values(Vec<Value>),
}

/// One rule of a [`SchemaDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Constraint kind or extension name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Constraint parameters, or extension arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Message override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw rule: fail on empty input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Raw rule: lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Raw rule: upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Raw rule: declared JSON type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
}

impl RuleSpec {
    /// Raw-rule fields set on this rule. Only meaningful without `kind`.
    fn raw_fields(&self) -> Vec<&'static str> {
        [
            ("required", self.required.is_some()),
            ("min", self.min.is_some()),
            ("max", self.max.is_some()),
            ("type", self.schema_type.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    fn is_raw(&self) -> bool {
        self.message.is_some() || !self.raw_fields().is_empty()
    }

    fn to_form_rule(&self) -> FormRule {
        FormRule {
            schema_type: self.schema_type,
            required: self.required,
            message: self.message.clone(),
            min: self.min,
            max: self.max,
            validator: None,
        }
    }

    fn message(&self) -> Option<Message> {
        self.message.clone().map(Message::from)
    }

    /// Extension arguments: a list is spread, a scalar is one argument.
    fn args(&self) -> Vec<Value> {
        match &self.value {
            None => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        }
    }
}

impl SchemaDocument {
    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        serde_yaml::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Build the schema with `valr`'s messages and extensions.
    pub fn build(&self, valr: &Valr) -> Result<AnySchema, ValrError> {
        let schema = match self.schema_type {
            SchemaType::String => AnySchema::from(self.build_with(valr.string(), apply_string)?),
            SchemaType::Number => AnySchema::from(self.build_with(valr.number(), apply_number)?),
            SchemaType::Array => AnySchema::from(self.build_with(valr.array(), apply_array)?),
        };
        tracing::debug!(schema = %self.schema_type, rules = self.rules.len(), "built schema document");
        Ok(schema)
    }

    fn build_with<K: SchemaKind>(
        &self,
        mut schema: Schema<K>,
        apply: fn(Schema<K>, &str, Param<'_>, Option<Message>) -> Result<Schema<K>, DocumentError>,
    ) -> Result<Schema<K>, ValrError> {
        if let Some(optional) = &self.optional {
            schema = with_optional(schema, optional);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(kind) = &rule.kind {
                let fields = rule.raw_fields();
                if !fields.is_empty() {
                    return Err(DocumentError::InvalidParameter {
                        schema: K::TYPE,
                        kind: kind.clone(),
                        reason: format!("{} cannot be combined with a kind", fields.join(", ")),
                    }
                    .into());
                }
            }
            schema = match rule.kind.as_deref() {
                Some("required") => schema.required(rule.message()),
                Some("optional") => {
                    let spec = match &rule.value {
                        None => OptionalSpec::Enabled(true),
                        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                            DocumentError::InvalidParameter {
                                schema: K::TYPE,
                                kind: "optional".to_string(),
                                reason: e.to_string(),
                            }
                        })?,
                    };
                    with_optional(schema, &spec)
                }
                Some(kind) if extension::is_builtin(K::TYPE, kind) => {
                    let param = Param {
                        schema: K::TYPE,
                        kind,
                        value: rule.value.as_ref(),
                    };
                    apply(schema, kind, param, rule.message())?
                }
                Some(kind) => schema.invoke(kind, rule.args())?,
                None if rule.is_raw() => schema.concat([rule.to_form_rule()]),
                None => return Err(DocumentError::EmptyRule { index }.into()),
            };
        }
        Ok(schema)
    }
}

fn with_optional<K: SchemaKind>(schema: Schema<K>, spec: &OptionalSpec) -> Schema<K> {
    match spec {
        OptionalSpec::Enabled(true) => schema.optional(),
        OptionalSpec::Enabled(false) => schema,
        OptionalSpec::Values(values) => schema.optional_values(values.iter().cloned()),
    }
}

/// A rule's `value`, with the context needed to report a bad one.
#[derive(Debug, Clone, Copy)]
struct Param<'a> {
    schema: SchemaType,
    kind: &'a str,
    value: Option<&'a Value>,
}

impl Param<'_> {
    fn invalid(&self, reason: impl Into<String>) -> DocumentError {
        DocumentError::InvalidParameter {
            schema: self.schema,
            kind: self.kind.to_string(),
            reason: reason.into(),
        }
    }

    fn count(&self) -> Result<usize, DocumentError> {
        self.value
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.invalid("expected a non-negative integer"))
    }

    fn number(&self) -> Result<f64, DocumentError> {
        self.value
            .and_then(Value::as_f64)
            .ok_or_else(|| self.invalid("expected a number"))
    }

    fn text(&self) -> Result<String, DocumentError> {
        self.value
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.invalid("expected a string"))
    }

    fn pair(&self) -> Result<(&Value, &Value), DocumentError> {
        match self.value.and_then(Value::as_array).map(Vec::as_slice) {
            Some([low, high]) => Ok((low, high)),
            _ => Err(self.invalid("expected a [min, max] pair")),
        }
    }

    fn count_pair(&self) -> Result<(usize, usize), DocumentError> {
        let (low, high) = self.pair()?;
        let as_count = |v: &Value| {
            v.as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| self.invalid("bounds must be non-negative integers"))
        };
        Ok((as_count(low)?, as_count(high)?))
    }

    fn number_pair(&self) -> Result<(f64, f64), DocumentError> {
        let (low, high) = self.pair()?;
        match (low.as_f64(), high.as_f64()) {
            (Some(low), Some(high)) => Ok((low, high)),
            _ => Err(self.invalid("bounds must be numbers")),
        }
    }

    fn values(&self) -> Result<Vec<Value>, DocumentError> {
        match self.value {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(single) => Ok(vec![single.clone()]),
            None => Err(self.invalid("expected a list of values")),
        }
    }

    fn ip_version(&self) -> Result<Option<IpVersion>, DocumentError> {
        match self.value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match value.as_u64() {
                Some(4) => Ok(Some(IpVersion::V4)),
                Some(6) => Ok(Some(IpVersion::V6)),
                _ => serde_json::from_value(value.clone())
                    .map(Some)
                    .map_err(|_| self.invalid("expected 4, 6, \"v4\", or \"v6\"")),
            },
        }
    }

    fn password(&self) -> Result<PasswordOptions, DocumentError> {
        match self.value {
            None | Some(Value::Null) => Ok(PasswordOptions::default()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| self.invalid(e.to_string()))
            }
        }
    }

    fn regex(&self) -> Result<Regex, DocumentError> {
        let pattern = self.text()?;
        Regex::new(&pattern).map_err(|e| DocumentError::InvalidRegex {
            pattern,
            reason: e.to_string(),
        })
    }

    fn unsupported(&self) -> DocumentError {
        self.invalid("not available in schema documents")
    }
}

fn apply_string(
    schema: Schema<StringKind>,
    kind: &str,
    param: Param<'_>,
    message: Option<Message>,
) -> Result<Schema<StringKind>, DocumentError> {
    Ok(match kind {
        "min" => schema.min(param.count()?, message),
        "max" => schema.max(param.count()?, message),
        "range" => {
            let (min, max) = param.count_pair()?;
            schema.range(min, max, message)
        }
        "len" => schema.len(param.count()?, message),
        "byteLen" | "byte_len" => {
            let (min, max) = param.count_pair()?;
            schema.byte_len(min, max, message)
        }
        "equal" => schema.equal(param.text()?, message),
        "contain" => schema.contain(param.text()?, message),
        "startsWith" | "starts_with" => schema.starts_with(param.text()?, message),
        "endsWith" | "ends_with" => schema.ends_with(param.text()?, message),
        "regex" => schema.regex(param.regex()?, message),
        "uppercase" => schema.uppercase(message),
        "lowercase" => schema.lowercase(message),
        "alphanumeric" => schema.alphanumeric(message),
        "phone" => schema.phone(message),
        "email" => schema.email(message),
        "url" => schema.url(message),
        "ip" => schema.ip(param.ip_version()?, message),
        "password" => schema.password(param.password()?, message),
        _ => return Err(param.unsupported()),
    })
}

fn apply_number(
    schema: Schema<NumberKind>,
    kind: &str,
    param: Param<'_>,
    message: Option<Message>,
) -> Result<Schema<NumberKind>, DocumentError> {
    Ok(match kind {
        "min" | "gte" => schema.min(param.number()?, message),
        "max" | "lte" => schema.max(param.number()?, message),
        "range" => {
            let (min, max) = param.number_pair()?;
            schema.range(min, max, message)
        }
        "gt" => schema.gt(param.number()?, message),
        "lt" => schema.lt(param.number()?, message),
        "equal" => schema.equal(param.number()?, message),
        "integer" => schema.integer(message),
        "decimal" => schema.decimal(param.count()?, message),
        "positive" => schema.positive(message),
        "negative" => schema.negative(message),
        "nonnegative" => schema.nonnegative(message),
        "nonpositive" => schema.nonpositive(message),
        "port" => schema.port(message),
        _ => return Err(param.unsupported()),
    })
}

fn apply_array(
    schema: Schema<ArrayKind>,
    kind: &str,
    param: Param<'_>,
    message: Option<Message>,
) -> Result<Schema<ArrayKind>, DocumentError> {
    Ok(match kind {
        "min" => schema.min(param.count()?, message),
        "max" => schema.max(param.count()?, message),
        "range" => {
            let (min, max) = param.count_pair()?;
            schema.range(min, max, message)
        }
        "len" => schema.len(param.count()?, message),
        "includes" => schema.includes(param.values()?, message),
        "excludes" => schema.excludes(param.values()?, message),
        "unique" => schema.unique(message),
        _ => return Err(param.unsupported()),
    })
}

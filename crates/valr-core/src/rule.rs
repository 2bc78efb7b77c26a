//! # External Rule Shapes
//!
//! The two rule shapes handed to form-validation runners.
//!
//! - **Shape A** ([`FormRule`]): `validator(value, callback)`; the callback
//!   receives `Some(message)` on failure and `None` on success.
//! - **Shape B** ([`TriggerRule`]): `validator(rule, value, callback)`; the
//!   callback receives `Some(RuleError)` on failure and `None` on success.
//!   Rules also carry the UI events that trigger them.
//!
//! Both shapes carry the declarative metadata (`type`, `required`,
//! `message`, `min`, `max`) that host UI frameworks inspect directly.
//! [`RuleMeta`] is the serializable view of that metadata.

use std::fmt;
use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::kind::SchemaType;

/// Shape-A validator: `(value, callback)`.
pub type FormValidator = Arc<dyn Fn(&Value, &mut dyn FnMut(Option<String>)) + Send + Sync>;

/// Shape-B validator: `(rule, value, callback)`.
pub type TriggerValidator =
    Arc<dyn Fn(&TriggerRule, &Value, &mut dyn FnMut(Option<RuleError>)) + Send + Sync>;

/// Error-like value passed to shape-B callbacks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleError {
    /// The resolved validation message.
    pub message: String,
}

impl RuleError {
    /// Wrap a resolved message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// UI events that re-run a shape-B rule.
///
/// Serializes the way form runners read it: a bare event name for a single
/// event, and `["change", "blur"]` for [`Trigger::Both`]. Deserialization
/// accepts either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Validate when the value changes.
    Change,
    /// Validate when the field loses focus.
    Blur,
    /// Validate on both events.
    Both,
}

impl Trigger {
    /// Event names in the form UI runners expect.
    pub fn events(&self) -> &'static [&'static str] {
        match self {
            Trigger::Change => &["change"],
            Trigger::Blur => &["blur"],
            Trigger::Both => &["change", "blur"],
        }
    }

    /// The trigger covering exactly these events, if they are all known.
    pub fn from_events<S: AsRef<str>>(events: &[S]) -> Option<Self> {
        let mut change = false;
        let mut blur = false;
        for event in events {
            match event.as_ref() {
                "change" => change = true,
                "blur" => blur = true,
                _ => return None,
            }
        }
        match (change, blur) {
            (true, true) => Some(Trigger::Both),
            (true, false) => Some(Trigger::Change),
            (false, true) => Some(Trigger::Blur),
            (false, false) => None,
        }
    }
}

impl Serialize for Trigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.events() {
            [event] => serializer.serialize_str(event),
            events => events.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Trigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Events {
            One(String),
            Many(Vec<String>),
        }

        let events = match Events::deserialize(deserializer)? {
            Events::One(event) => vec![event],
            Events::Many(events) => events,
        };
        Trigger::from_events(events.as_slice()).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid trigger {events:?}: expected \"change\", \"blur\", or a list of them"
            ))
        })
    }
}

/// Serializable view of a rule's declarative fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleMeta {
    /// Declared JSON type the runner should check.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Whether an empty value fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Message reported by the declarative checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Lower bound (length for strings/arrays, value for numbers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound (length for strings/arrays, value for numbers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Trigger events (shape B only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
    /// Whether the rule has a validator function.
    pub validator: bool,
}

/// Shape-A rule: plain engine rules and externally authored raw rules.
#[derive(Clone, Default)]
pub struct FormRule {
    /// Declared JSON type the runner should check.
    pub schema_type: Option<SchemaType>,
    /// Whether an empty value fails.
    pub required: Option<bool>,
    /// Message reported by the declarative checks.
    pub message: Option<String>,
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// Callback-style validator.
    pub validator: Option<FormValidator>,
}

impl FormRule {
    /// A rule with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A `required` rule with the given message.
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: Some(true),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A rule whose only field is a validator.
    pub fn from_validator<F>(validator: F) -> Self
    where
        F: Fn(&Value, &mut dyn FnMut(Option<String>)) + Send + Sync + 'static,
    {
        Self {
            validator: Some(Arc::new(validator)),
            ..Self::default()
        }
    }

    /// Set the declared type.
    pub fn with_type(mut self, schema_type: SchemaType) -> Self {
        self.schema_type = Some(schema_type);
        self
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the bounds.
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Run the validator once and return what it reported.
    ///
    /// Rules without a validator pass. Only the first callback counts.
    pub fn run(&self, value: &Value) -> Option<String> {
        let validator = self.validator.as_ref()?;
        let mut reported: Option<Option<String>> = None;
        validator(value, &mut |result: Option<String>| {
            if reported.is_none() {
                reported = Some(result);
            }
        });
        reported.flatten()
    }

    /// Declarative fields of this rule.
    pub fn meta(&self) -> RuleMeta {
        RuleMeta {
            schema_type: self.schema_type,
            required: self.required,
            message: self.message.clone(),
            min: self.min,
            max: self.max,
            trigger: None,
            validator: self.validator.is_some(),
        }
    }
}

impl fmt::Debug for FormRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRule")
            .field("type", &self.schema_type)
            .field("required", &self.required)
            .field("message", &self.message)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Shape-B rule: shape A plus trigger events and an Error-valued callback.
#[derive(Clone, Default)]
pub struct TriggerRule {
    /// Declared JSON type the runner should check.
    pub schema_type: Option<SchemaType>,
    /// Whether an empty value fails.
    pub required: Option<bool>,
    /// Message reported by the declarative checks.
    pub message: Option<String>,
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// Events that re-run this rule.
    pub trigger: Option<Trigger>,
    /// Callback-style validator.
    pub validator: Option<TriggerValidator>,
}

impl TriggerRule {
    /// Run the validator once and return the error it reported.
    ///
    /// Rules without a validator pass. Only the first callback counts.
    pub fn run(&self, value: &Value) -> Option<RuleError> {
        let validator = self.validator.as_ref()?;
        let mut reported: Option<Option<RuleError>> = None;
        validator(self, value, &mut |result: Option<RuleError>| {
            if reported.is_none() {
                reported = Some(result);
            }
        });
        reported.flatten()
    }

    /// Declarative fields of this rule.
    pub fn meta(&self) -> RuleMeta {
        RuleMeta {
            schema_type: self.schema_type,
            required: self.required,
            message: self.message.clone(),
            min: self.min,
            max: self.max,
            trigger: self.trigger,
            validator: self.validator.is_some(),
        }
    }
}

impl fmt::Debug for TriggerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerRule")
            .field("type", &self.schema_type)
            .field("required", &self.required)
            .field("message", &self.message)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("trigger", &self.trigger)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

//! # Schema Builder
//!
//! [`Schema<K>`] is the chainable builder shared by every schema type. It
//! owns an ordered list of items (descriptors interleaved with raw rules)
//! plus an optional matcher, and holds handles to the message table and
//! the extension registry of the [`Valr`](crate::Valr) that created it.
//!
//! Builder methods consume the schema and return it, so a chain reads like
//! `valr.string().min(3, None).email(None)`. Type-specific methods live in
//! the `string`, `number`, and `array` modules; this module holds the
//! common vocabulary and the ways to run a schema.
//!
//! A schema is never mutated by validation. Cloning it is cheap: items are
//! reference counted.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;
use valr_core::{
    FormRule, Messages, RegistryError, SchemaType, Trigger, TriggerRule,
};

use crate::adapter;
use crate::compile::{self, Item, Rule};
use crate::descriptor::{Descriptor, Message, MessageContext};
use crate::extension::Extensions;
use crate::kind::SchemaKind;
use crate::pipeline::{Evaluator, Optional};
use crate::runner::{FormRunner, Outcome};

/// A chainable, typed list of constraints.
pub struct Schema<K: SchemaKind> {
    messages: Messages,
    extensions: Extensions,
    items: Vec<Item<K>>,
    optional: Option<Optional>,
}

impl<K: SchemaKind> Clone for Schema<K> {
    fn clone(&self) -> Self {
        Self {
            messages: self.messages.clone(),
            extensions: self.extensions.clone(),
            items: self.items.clone(),
            optional: self.optional.clone(),
        }
    }
}

impl<K: SchemaKind> fmt::Debug for Schema<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type", &K::TYPE)
            .field("items", &self.items)
            .field("optional", &self.optional)
            .finish()
    }
}

impl<K: SchemaKind> Schema<K> {
    pub(crate) fn new(messages: Messages, extensions: Extensions) -> Self {
        Self {
            messages,
            extensions,
            items: Vec::new(),
            optional: None,
        }
    }

    /// Declared type of this schema.
    pub fn schema_type(&self) -> SchemaType {
        K::TYPE
    }

    /// The message table this schema resolves against.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub(crate) fn push_check(
        mut self,
        constraint: K::Constraint,
        message: impl Into<Option<Message>>,
    ) -> Self {
        self.items.push(Item::Descriptor(Arc::new(Descriptor::Check {
            constraint,
            message: message.into(),
        })));
        self
    }

    /// Append a custom validator. It receives the coerced value and the raw
    /// input and returns a message on failure. An empty message passes.
    pub fn custom<F>(mut self, validator: F) -> Self
    where
        F: Fn(&K::Value, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.items
            .push(Item::Descriptor(Arc::new(Descriptor::Custom(Arc::new(validator)))));
        self
    }

    /// Append a raw `{ required: true, message }` rule.
    ///
    /// Raw rules carry plain text, so the message is fixed now: a function
    /// message is called once with kind `"required"`, and without a message
    /// the table's `required` entry is read.
    pub fn required(mut self, message: impl Into<Option<Message>>) -> Self {
        let message = match message.into() {
            Some(Message::Literal(text)) => text,
            Some(Message::Func(f)) => f(&MessageContext {
                schema: K::TYPE,
                kind: "required",
                value: &Value::Null,
            }),
            None => self.messages.required(),
        };
        self.items.push(Item::Raw(FormRule::required(message)));
        self
    }

    /// Skip validation for `""` and null.
    pub fn optional(self) -> Self {
        self.with_optional(Optional::default_whitelist())
    }

    /// Skip validation for inputs equal to any of `values`.
    pub fn optional_values(self, values: impl IntoIterator<Item = Value>) -> Self {
        self.with_optional(Optional::Whitelist(values.into_iter().collect()))
    }

    /// Skip validation for inputs matching `predicate`.
    pub fn optional_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.with_optional(Optional::Predicate(Arc::new(predicate)))
    }

    fn with_optional(mut self, optional: Optional) -> Self {
        self.optional = Some(optional);
        self
    }

    /// Append externally authored rules. They pass through compilation
    /// unchanged and split descriptor groups around them.
    pub fn concat(mut self, rules: impl IntoIterator<Item = FormRule>) -> Self {
        self.items.extend(rules.into_iter().map(Item::Raw));
        self
    }

    /// Append a call to the extension method `name` with `args`.
    ///
    /// The extension receives the raw input, not the coerced value.
    pub fn invoke(mut self, name: &str, args: Vec<Value>) -> Result<Self, RegistryError> {
        let extension = self.extensions.get(K::TYPE, name)?;
        self.items.push(Item::Descriptor(Arc::new(Descriptor::Custom(Arc::new(
            move |_: &K::Value, input: &Value| extension(input, &args),
        )))));
        Ok(self)
    }

    fn evaluator(&self) -> Evaluator<K> {
        Evaluator::new(self.messages.clone(), self.optional.clone())
    }

    /// Compile the items into rules.
    pub fn rules(&self) -> Vec<Rule> {
        compile::compile(&self.items, &self.evaluator())
    }

    /// Rules in shape A (`validator(value, callback)`).
    pub fn form_rules(&self) -> Vec<FormRule> {
        self.rules().into_iter().map(adapter::to_form_rule).collect()
    }

    /// Rules in shape B, tagged with `trigger`.
    pub fn trigger_rules(&self, trigger: Option<Trigger>) -> Vec<TriggerRule> {
        self.rules()
            .into_iter()
            .map(|rule| adapter::to_trigger_rule(rule, trigger))
            .collect()
    }

    /// Run the pipeline over every descriptor, ignoring raw rules.
    pub fn evaluate(&self, input: &Value) -> Option<String> {
        let descriptors: Vec<_> = self
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Descriptor(descriptor) => Some(Arc::clone(descriptor)),
                Item::Raw(_) => None,
            })
            .collect();
        self.evaluator().evaluate(&descriptors, input)
    }

    fn runner(&self) -> FormRunner {
        FormRunner::new(self.trigger_rules(None), self.messages.clone())
    }

    /// Validate `input` through the form runner, raw rules included.
    pub fn check(&self, input: &Value) -> Option<String> {
        self.runner().validate(input).map(|error| error.message)
    }

    /// Asynchronous form of [`check`](Self::check). Never fails.
    pub async fn validate(&self, input: &Value) -> Outcome {
        let (tx, rx) = oneshot::channel();
        self.runner().run(input, move |error| {
            // The receiver is held below; a send cannot be refused.
            let _ = tx.send(Outcome::from(error));
        });
        rx.await.unwrap_or_default()
    }

    /// [`validate`](Self::validate), also handing the result to `callback`.
    pub async fn validate_with<F>(&self, input: &Value, callback: F) -> Outcome
    where
        F: FnOnce(bool, Option<&str>),
    {
        let outcome = self.validate(input).await;
        callback(outcome.error, outcome.message.as_deref());
        outcome
    }
}

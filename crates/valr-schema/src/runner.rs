//! # Form Runner
//!
//! A generic form-validation engine for shape-B rules, the counterpart of
//! the runners UI frameworks ship. It runs a field's rules in order and
//! reports the first failure.
//!
//! For each rule:
//!
//! 1. `required` and the value is empty (`null`, `""`, `[]`): fail with
//!    the rule's message, or the table's `required` entry.
//! 2. Empty and not required: skip the declarative checks.
//! 3. `type`: the value must have that JSON type.
//! 4. `min` / `max`: compared against the length of strings and arrays and
//!    the value of numbers.
//! 5. `validator`, if any, always runs last.

use serde::Serialize;
use serde_json::Value;
use valr_core::{coerce, Messages, RuleError, SchemaType, TriggerRule};

/// Result of an asynchronous validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether validation failed.
    pub error: bool,
    /// The failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self::default()
    }

    /// A failing outcome.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: Some(message.into()),
        }
    }
}

impl From<Option<RuleError>> for Outcome {
    fn from(error: Option<RuleError>) -> Self {
        match error {
            Some(error) => Self::fail(error.message),
            None => Self::pass(),
        }
    }
}

/// Runs one field's shape-B rules.
#[derive(Debug, Clone)]
pub struct FormRunner {
    rules: Vec<TriggerRule>,
    messages: Messages,
}

impl FormRunner {
    /// A runner over `rules`, falling back to `messages` for defaults.
    pub fn new(rules: Vec<TriggerRule>, messages: Messages) -> Self {
        Self { rules, messages }
    }

    /// The rules this runner applies.
    pub fn rules(&self) -> &[TriggerRule] {
        &self.rules
    }

    /// Validate `value` and hand the first failure, if any, to `callback`.
    pub fn run<F>(&self, value: &Value, callback: F)
    where
        F: FnOnce(Option<RuleError>),
    {
        callback(self.validate(value));
    }

    /// Validate `value` and return the first failure.
    pub fn validate(&self, value: &Value) -> Option<RuleError> {
        self.rules.iter().find_map(|rule| self.apply(rule, value))
    }

    fn apply(&self, rule: &TriggerRule, value: &Value) -> Option<RuleError> {
        if let Some(message) = self.declarative(rule, value) {
            tracing::trace!(?rule, "declarative rule failed");
            return Some(RuleError::new(message));
        }
        rule.run(value)
    }

    fn declarative(&self, rule: &TriggerRule, value: &Value) -> Option<String> {
        let empty = coerce::is_empty(value);
        if empty {
            if rule.required == Some(true) {
                return Some(self.message_for(rule, || self.messages.required()));
            }
            return None;
        }

        if let Some(schema_type) = rule.schema_type {
            if !has_type(schema_type, value) {
                return Some(self.message_for(rule, || {
                    self.messages
                        .get(&schema_type.type_message_key())
                        .unwrap_or_else(|| self.messages.default_message())
                }));
            }
        }

        let measure = measure(value)?;
        let below = rule.min.is_some_and(|min| measure < min);
        let above = rule.max.is_some_and(|max| measure > max);
        (below || above).then(|| self.message_for(rule, || self.messages.default_message()))
    }

    fn message_for(&self, rule: &TriggerRule, fallback: impl FnOnce() -> String) -> String {
        rule.message
            .as_ref()
            .filter(|message| !message.is_empty())
            .cloned()
            .unwrap_or_else(fallback)
    }
}

fn has_type(schema_type: SchemaType, value: &Value) -> bool {
    match schema_type {
        SchemaType::String => value.is_string(),
        SchemaType::Number => value.is_number(),
        SchemaType::Array => value.is_array(),
    }
}

/// Length of strings (in characters) and arrays, or the value of numbers.
fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use valr_core::FormRule;

    fn trigger_rule(rule: FormRule) -> TriggerRule {
        TriggerRule {
            schema_type: rule.schema_type,
            required: rule.required,
            message: rule.message,
            min: rule.min,
            max: rule.max,
            ..TriggerRule::default()
        }
    }

    fn runner(rules: Vec<TriggerRule>) -> FormRunner {
        FormRunner::new(rules, Messages::defaults())
    }

    #[test]
    fn required_fails_on_empty_values() {
        let runner = runner(vec![trigger_rule(FormRule::required("必填项"))]);
        for empty in [Value::Null, json!(""), json!([])] {
            assert_eq!(runner.validate(&empty), Some(RuleError::new("必填项")));
        }
        assert_eq!(runner.validate(&json!(0)), None);
    }

    #[test]
    fn required_without_message_uses_table() {
        let rule = TriggerRule {
            required: Some(true),
            ..TriggerRule::default()
        };
        assert_eq!(runner(vec![rule]).validate(&json!("")), Some(RuleError::new("必填")));
    }

    #[test]
    fn empty_optional_value_skips_declarative_checks() {
        let rule = trigger_rule(FormRule::new().with_type(SchemaType::Number));
        assert_eq!(runner(vec![rule]).validate(&json!("")), None);
    }

    #[test]
    fn type_and_bounds() {
        let rule = trigger_rule(
            FormRule::new()
                .with_type(SchemaType::String)
                .with_bounds(Some(2.0), Some(3.0)),
        );
        let runner = runner(vec![rule]);
        assert_eq!(runner.validate(&json!(12)), Some(RuleError::new("验证失败")));
        assert_eq!(runner.validate(&json!("a")), Some(RuleError::new("验证失败")));
        assert_eq!(runner.validate(&json!("中文字")), None);
        assert_eq!(runner.validate(&json!("abcd")), Some(RuleError::new("验证失败")));
    }

    #[test]
    fn type_failure_uses_types_message() {
        let rule = trigger_rule(FormRule::new().with_type(SchemaType::Array));
        assert_eq!(runner(vec![rule]).validate(&json!("x")), Some(RuleError::new("必须为数组")));
    }

    #[test]
    fn first_failing_rule_wins() {
        let runner = runner(vec![
            trigger_rule(FormRule::new().with_bounds(Some(10.0), None).with_message("too small")),
            trigger_rule(FormRule::new().with_bounds(None, Some(1.0)).with_message("too big")),
        ]);
        assert_eq!(runner.validate(&json!(5)), Some(RuleError::new("too small")));
    }

    #[test]
    fn run_calls_back_with_result() {
        let runner = runner(vec![trigger_rule(FormRule::required("x"))]);
        let mut seen = None;
        runner.run(&Value::Null, |error| seen = Some(error));
        assert_eq!(seen, Some(Some(RuleError::new("x"))));
    }

    #[test]
    fn outcome_serializes_without_empty_message() {
        assert_eq!(serde_json::to_value(Outcome::pass()).unwrap(), json!({"error": false}));
        assert_eq!(
            serde_json::to_value(Outcome::fail("bad")).unwrap(),
            json!({"error": true, "message": "bad"})
        );
    }
}

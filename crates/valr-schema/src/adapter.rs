//! # Adapter Translators
//!
//! Stateless functions that turn compiled [`Rule`]s into the two external
//! rule shapes. The pipeline runs only when a runner calls the resulting
//! validator, and exactly once per call.
//!
//! - Shape A: `validator(value, cb)` with `cb(Some(message))` on failure.
//! - Shape B: `validator(rule, value, cb)` with `cb(Some(RuleError))` on
//!   failure.
//!
//! Compiled rules carry no declarative fields. Raw rules keep theirs, so
//! host UI frameworks that read `required`, `type`, `min`, or `max` see the
//! same metadata in either shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use valr_core::{FormRule, RuleError, Trigger, TriggerRule, TriggerValidator};

use crate::any::AnySchema;
use crate::compile::Rule;

/// Translate a rule to shape A.
pub fn to_form_rule(rule: Rule) -> FormRule {
    match rule {
        Rule::Raw(raw) => raw,
        Rule::Compiled(compiled) => {
            let check = compiled.check_fn();
            FormRule::from_validator(move |value, callback| callback(check(value)))
        }
    }
}

/// Translate a rule to shape B, tagged with `trigger`.
pub fn to_trigger_rule(rule: Rule, trigger: Option<Trigger>) -> TriggerRule {
    match rule {
        Rule::Compiled(compiled) => {
            let check = compiled.check_fn();
            TriggerRule {
                trigger,
                validator: Some(Arc::new(
                    move |_: &TriggerRule,
                          value: &Value,
                          callback: &mut dyn FnMut(Option<RuleError>)| {
                        callback(check(value).map(RuleError::new))
                    },
                )),
                ..TriggerRule::default()
            }
        }
        Rule::Raw(raw) => TriggerRule {
            schema_type: raw.schema_type,
            required: raw.required,
            message: raw.message,
            min: raw.min,
            max: raw.max,
            trigger,
            validator: raw.validator.map(|validator| -> TriggerValidator {
                Arc::new(
                    move |_: &TriggerRule,
                          value: &Value,
                          callback: &mut dyn FnMut(Option<RuleError>)| {
                        validator(value, &mut |message: Option<String>| {
                            callback(message.map(RuleError::new))
                        })
                    },
                )
            }),
        },
    }
}

/// Shape-A rules for every field of a schema map.
pub fn schema_to_rules(schemas: &BTreeMap<String, AnySchema>) -> BTreeMap<String, Vec<FormRule>> {
    schemas
        .iter()
        .map(|(field, schema)| (field.clone(), schema.form_rules()))
        .collect()
}

/// Shape-B rules for every field of a schema map.
pub fn schema_to_trigger_rules(
    schemas: &BTreeMap<String, AnySchema>,
    trigger: Option<Trigger>,
) -> BTreeMap<String, Vec<TriggerRule>> {
    schemas
        .iter()
        .map(|(field, schema)| (field.clone(), schema.trigger_rules(trigger)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Valr;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn shape_a_reports_plain_message() {
        let rules = Valr::new().string().min(3, None).form_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].run(&json!("ab")).as_deref(), Some("字符串长度最小值为 3"));
        assert_eq!(rules[0].run(&json!("abc")), None);
        assert_eq!(rules[0].meta().schema_type, None);
    }

    #[test]
    fn shape_b_wraps_message_in_error() {
        let rules = Valr::new().number().max(5.0, None).trigger_rules(Some(Trigger::Blur));
        assert_eq!(rules[0].trigger, Some(Trigger::Blur));
        assert_eq!(rules[0].run(&json!(6)), Some(RuleError::new("最大值为 5")));
        assert_eq!(rules[0].run(&json!(5)), None);
    }

    #[test]
    fn shape_b_metadata_lists_both_events() {
        let rules = Valr::new().string().min(2, None).trigger_rules(Some(Trigger::Both));
        let meta = serde_json::to_value(rules[0].meta()).unwrap();
        assert_eq!(meta["trigger"], json!(["change", "blur"]));
    }

    #[test]
    fn raw_rule_metadata_survives_both_shapes() {
        let raw = FormRule::required("必须填写")
            .with_type(valr_core::SchemaType::String)
            .with_bounds(Some(1.0), Some(4.0));
        let schema = Valr::new().string().concat([raw.clone()]);

        let a = schema.form_rules();
        assert_eq!(a[0].meta(), raw.meta());

        let b = schema.trigger_rules(Some(Trigger::Change));
        let meta = b[0].meta();
        assert_eq!(meta.required, Some(true));
        assert_eq!(meta.message.as_deref(), Some("必须填写"));
        assert_eq!(meta.min, Some(1.0));
        assert_eq!(meta.max, Some(4.0));
        assert_eq!(meta.trigger, Some(Trigger::Change));
    }

    #[test]
    fn raw_validator_is_wrapped_for_shape_b() {
        let raw = FormRule::from_validator(|_, cb| cb(Some("raw".to_string())));
        let rules = Valr::new().string().concat([raw]).trigger_rules(None);
        assert_eq!(rules[0].run(&json!("x")), Some(RuleError::new("raw")));
    }

    #[test]
    fn pipeline_runs_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let rules = Valr::new()
            .string()
            .custom(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            })
            .trigger_rules(None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        rules[0].run(&json!("a"));
        rules[0].run(&json!("b"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn schema_maps_translate_per_field() {
        let valr = Valr::new();
        let mut schemas = BTreeMap::new();
        schemas.insert("name".to_string(), AnySchema::from(valr.string().required(None).max(4, None)));
        schemas.insert("age".to_string(), AnySchema::from(valr.number().integer(None)));

        let rules = schema_to_rules(&schemas);
        assert_eq!(rules["name"].len(), 2);
        assert_eq!(rules["age"].len(), 1);

        let triggered = schema_to_trigger_rules(&schemas, Some(Trigger::Both));
        assert!(triggered["name"].iter().all(|rule| rule.trigger == Some(Trigger::Both)));
        assert_eq!(triggered["age"][0].run(&json!(1.5)), Some(RuleError::new("必须为整数")));
    }
}

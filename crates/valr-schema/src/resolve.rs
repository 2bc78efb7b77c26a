//! # Message Resolution
//!
//! Turns a failing descriptor into the message shown to the user.
//!
//! Precedence:
//!
//! 1. A function override is called with the descriptor's context.
//! 2. A non-empty literal override is returned verbatim.
//! 3. Otherwise `table["<type>.<kind>"]` (or `table.default`) is rendered
//!    with the descriptor's parameters.
//!
//! A missing key or an unmatched placeholder degrades gracefully; message
//! resolution never fails.

use valr_core::{template, Messages, SchemaType};

use crate::descriptor::{Constraint, Message, MessageContext};

/// Resolve the message for a failed constraint.
pub fn resolve<T, C: Constraint<T>>(
    schema: SchemaType,
    constraint: &C,
    message: Option<&Message>,
    messages: &Messages,
) -> String {
    let params = constraint.params();
    match message {
        Some(Message::Func(f)) => f(&MessageContext {
            schema,
            kind: constraint.kind(),
            value: &params,
        }),
        Some(Message::Literal(text)) if !text.is_empty() => text.clone(),
        _ => {
            let template = messages.lookup(schema, constraint.kind());
            template::render(&template, &params)
        }
    }
}

/// Message reported when a raw input is not of the declared type.
pub fn type_failure(schema: SchemaType, messages: &Messages) -> String {
    messages
        .get(&schema.type_message_key())
        .unwrap_or_else(|| messages.default_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[derive(Debug)]
    struct Between(i64, i64);

    impl Constraint<i64> for Between {
        fn kind(&self) -> &'static str {
            "range"
        }

        fn params(&self) -> Value {
            json!([self.0, self.1])
        }

        fn test(&self, value: &i64, _input: &Value) -> bool {
            (self.0..=self.1).contains(value)
        }
    }

    #[derive(Debug)]
    struct Unlisted;

    impl Constraint<i64> for Unlisted {
        fn kind(&self) -> &'static str {
            "unlisted"
        }

        fn params(&self) -> Value {
            Value::Null
        }

        fn test(&self, _value: &i64, _input: &Value) -> bool {
            false
        }
    }

    #[test]
    fn table_template_is_rendered() {
        let messages = Messages::defaults();
        let msg = resolve(SchemaType::Number, &Between(1, 9), None, &messages);
        assert_eq!(msg, "输入范围为 1 到 9");
    }

    #[test]
    fn literal_wins_over_table() {
        let messages = Messages::defaults();
        let literal = Message::from("out of range {0}");
        let msg = resolve(SchemaType::Number, &Between(1, 9), Some(&literal), &messages);
        assert_eq!(msg, "out of range {0}");
    }

    #[test]
    fn empty_literal_falls_through_to_table() {
        let messages = Messages::defaults();
        let literal = Message::from("");
        let msg = resolve(SchemaType::Number, &Between(1, 9), Some(&literal), &messages);
        assert_eq!(msg, "输入范围为 1 到 9");
    }

    #[test]
    fn function_sees_parameters() {
        let messages = Messages::defaults();
        let func = Message::func(|ctx| format!("{}.{} {}", ctx.schema, ctx.kind, ctx.value));
        let msg = resolve(SchemaType::Number, &Between(1, 9), Some(&func), &messages);
        assert_eq!(msg, "number.range [1,9]");
    }

    #[test]
    fn unknown_kind_uses_default() {
        let messages = Messages::defaults();
        assert_eq!(resolve(SchemaType::Number, &Unlisted, None, &messages), "验证失败");
    }

    #[test]
    fn type_failures() {
        let messages = Messages::defaults();
        assert_eq!(type_failure(SchemaType::Number, &messages), "必须为数字");
        assert_eq!(type_failure(SchemaType::Array, &messages), "必须为数组");
        // No `types.string` entry ships; strings never fail coercion anyway.
        assert_eq!(type_failure(SchemaType::String, &messages), "验证失败");
    }
}

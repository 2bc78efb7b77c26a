//! # Message Templates
//!
//! Substitutes descriptor parameters into message templates.
//!
//! - Positional: `{0}`, `{1}`, … are filled from an array-shaped value.
//! - Named: `{name}` is filled from an object-shaped value.
//! - Any other value is treated as a one-element array.
//!
//! Placeholders with no matching parameter (or a `null` one) are left in
//! the output exactly as written. Rendering never fails.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::coerce;

fn positional_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("static pattern compiles"))
}

fn named_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("static pattern compiles"))
}

/// Render `template` with the parameters in `value`.
pub fn render(template: &str, value: &Value) -> String {
    match value {
        Value::Array(items) => render_positional(template, items),
        Value::Object(map) => named_pattern()
            .replace_all(template, |caps: &Captures<'_>| {
                substitute(map.get(&caps[1]), &caps[0])
            })
            .into_owned(),
        single => render_positional(template, std::slice::from_ref(single)),
    }
}

fn render_positional(template: &str, items: &[Value]) -> String {
    positional_pattern()
        .replace_all(template, |caps: &Captures<'_>| {
            let item = caps[1].parse::<usize>().ok().and_then(|i| items.get(i));
            substitute(item, &caps[0])
        })
        .into_owned()
}

fn substitute(param: Option<&Value>, placeholder: &str) -> String {
    match param {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(v) => coerce::to_string(v),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Templates without braces are returned unchanged for any parameter.
        #[test]
        fn brace_free_templates_are_identity(template in "[^{}]{0,40}", n in any::<i64>()) {
            prop_assert_eq!(render(&template, &json_number(n)), template);
        }

        /// Rendering never panics, whatever the template contains.
        #[test]
        fn rendering_is_total(template in ".{0,60}", items in prop::collection::vec(any::<i32>(), 0..4)) {
            let value = Value::Array(items.into_iter().map(Value::from).collect());
            let _ = render(&template, &value);
        }
    }

    fn json_number(n: i64) -> Value {
        Value::from(n)
    }
}

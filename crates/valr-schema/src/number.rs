//! Number schemas.
//!
//! Raw inputs go through ECMAScript `Number()` conversion; `NaN` is a type
//! failure reported with the `types.number` message. `gte` and `lte` are
//! spellings of `min` and `max` and share their messages.

use serde_json::{json, Number, Value};
use valr_core::{coerce, SchemaType};
use valr_predicates as predicates;

use crate::descriptor::{Constraint, Message};
use crate::kind::SchemaKind;
use crate::schema::Schema;

/// Marker for number schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberKind;

/// A number schema.
pub type NumberSchema = Schema<NumberKind>;

/// The number constraint vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberConstraint {
    /// `value >= n`.
    Min(f64),
    /// `value <= n`.
    Max(f64),
    /// `min <= value <= max`.
    Range(f64, f64),
    /// `value > n`.
    Gt(f64),
    /// `value < n`.
    Lt(f64),
    /// `value == n`.
    Equal(f64),
    /// No fractional part.
    Integer,
    /// At most this many fractional digits.
    Decimal(usize),
    /// `value > 0`.
    Positive,
    /// `value < 0`.
    Negative,
    /// `value >= 0`.
    Nonnegative,
    /// `value <= 0`.
    Nonpositive,
    /// Integer in `0..=65535`.
    Port,
}

impl SchemaKind for NumberKind {
    type Value = f64;
    type Constraint = NumberConstraint;
    const TYPE: SchemaType = SchemaType::Number;

    fn coerce(input: &Value) -> Option<f64> {
        let n = coerce::to_number(input);
        (!n.is_nan()).then_some(n)
    }
}

fn number_param(n: f64) -> Value {
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

impl Constraint<f64> for NumberConstraint {
    fn kind(&self) -> &'static str {
        match self {
            NumberConstraint::Min(_) => "min",
            NumberConstraint::Max(_) => "max",
            NumberConstraint::Range(..) => "range",
            NumberConstraint::Gt(_) => "gt",
            NumberConstraint::Lt(_) => "lt",
            NumberConstraint::Equal(_) => "equal",
            NumberConstraint::Integer => "integer",
            NumberConstraint::Decimal(_) => "decimal",
            NumberConstraint::Positive => "positive",
            NumberConstraint::Negative => "negative",
            NumberConstraint::Nonnegative => "nonnegative",
            NumberConstraint::Nonpositive => "nonpositive",
            NumberConstraint::Port => "port",
        }
    }

    fn params(&self) -> Value {
        match *self {
            NumberConstraint::Min(n)
            | NumberConstraint::Max(n)
            | NumberConstraint::Gt(n)
            | NumberConstraint::Lt(n)
            | NumberConstraint::Equal(n) => number_param(n),
            NumberConstraint::Range(min, max) => Value::Array(vec![number_param(min), number_param(max)]),
            NumberConstraint::Decimal(digits) => json!(digits),
            NumberConstraint::Integer
            | NumberConstraint::Positive
            | NumberConstraint::Negative
            | NumberConstraint::Nonnegative
            | NumberConstraint::Nonpositive
            | NumberConstraint::Port => Value::Null,
        }
    }

    fn test(&self, value: &f64, _input: &Value) -> bool {
        let v = *value;
        match *self {
            NumberConstraint::Min(n) => v >= n,
            NumberConstraint::Max(n) => v <= n,
            NumberConstraint::Range(min, max) => min <= v && v <= max,
            NumberConstraint::Gt(n) => v > n,
            NumberConstraint::Lt(n) => v < n,
            NumberConstraint::Equal(n) => v == n,
            NumberConstraint::Integer => predicates::is_integer(v),
            NumberConstraint::Decimal(digits) => predicates::within_decimal_places(v, digits),
            NumberConstraint::Positive => v > 0.0,
            NumberConstraint::Negative => v < 0.0,
            NumberConstraint::Nonnegative => v >= 0.0,
            NumberConstraint::Nonpositive => v <= 0.0,
            NumberConstraint::Port => predicates::is_port(v),
        }
    }
}

impl Schema<NumberKind> {
    /// At least `n`.
    pub fn min(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Min(n), message)
    }

    /// At most `n`.
    pub fn max(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Max(n), message)
    }

    /// Inclusive on both ends.
    pub fn range(self, min: f64, max: f64, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Range(min, max), message)
    }

    /// Strictly greater than `n`.
    pub fn gt(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Gt(n), message)
    }

    /// Same as [`min`](Self::min).
    pub fn gte(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.min(n, message)
    }

    /// Strictly less than `n`.
    pub fn lt(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Lt(n), message)
    }

    /// Same as [`max`](Self::max).
    pub fn lte(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.max(n, message)
    }

    /// Exactly `n`.
    pub fn equal(self, n: f64, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Equal(n), message)
    }

    /// A whole number.
    pub fn integer(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Integer, message)
    }

    /// At most `digits` digits after the decimal point.
    pub fn decimal(self, digits: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Decimal(digits), message)
    }

    /// Greater than zero.
    pub fn positive(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Positive, message)
    }

    /// Less than zero.
    pub fn negative(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Negative, message)
    }

    /// Zero or more.
    pub fn nonnegative(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Nonnegative, message)
    }

    /// Zero or less.
    pub fn nonpositive(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Nonpositive, message)
    }

    /// A TCP/UDP port number.
    pub fn port(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(NumberConstraint::Port, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Valr;

    fn number() -> NumberSchema {
        Valr::new().number()
    }

    #[test]
    fn coercion_failure_reports_type_message() {
        let schema = number().min(1.0, None);
        assert_eq!(schema.evaluate(&json!("abc")).as_deref(), Some("必须为数字"));
        assert_eq!(schema.evaluate(&json!({})).as_deref(), Some("必须为数字"));
        assert_eq!(schema.evaluate(&json!("0x10")), None);
        // Number(null) is 0.
        assert_eq!(schema.evaluate(&Value::Null).as_deref(), Some("最小值为 1"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(number().gt(5.0, None).evaluate(&json!(5)).as_deref(), Some("必须大于 5"));
        assert_eq!(number().lt(5.0, None).evaluate(&json!(5)).as_deref(), Some("必须小于 5"));
        assert_eq!(number().gte(5.0, None).evaluate(&json!(4)).as_deref(), Some("最小值为 5"));
        assert_eq!(number().lte(5.0, None).evaluate(&json!(6)).as_deref(), Some("最大值为 5"));
        assert_eq!(number().equal(2.5, None).evaluate(&json!("2.5")), None);
        assert_eq!(
            number().range(1.0, 9.0, None).evaluate(&json!(10)).as_deref(),
            Some("输入范围为 1 到 9")
        );
    }

    #[test]
    fn signs() {
        assert!(number().positive(None).evaluate(&json!(0)).is_some());
        assert!(number().negative(None).evaluate(&json!(0)).is_some());
        assert_eq!(number().nonnegative(None).evaluate(&json!(0)), None);
        assert_eq!(number().nonpositive(None).evaluate(&json!(0)), None);
        assert_eq!(
            number().nonpositive(None).evaluate(&json!(0.1)).as_deref(),
            Some("必须为非正数")
        );
    }

    #[test]
    fn integer_decimal_port() {
        assert_eq!(number().integer(None).evaluate(&json!("3")), None);
        assert_eq!(number().decimal(2, None).evaluate(&json!(1.25)), None);
        assert_eq!(
            number().decimal(2, None).evaluate(&json!(1.255)).as_deref(),
            Some("最多保留2位小数")
        );
        assert_eq!(number().port(None).evaluate(&json!(8080)), None);
        assert_eq!(number().port(None).evaluate(&json!(70000)).as_deref(), Some("端口号格式不正确"));
    }

    #[test]
    fn fractional_params_render_in_messages() {
        assert_eq!(number().min(0.5, None).evaluate(&json!(0.25)).as_deref(), Some("最小值为 0.5"));
    }
}

//! String schemas.
//!
//! Every input coerces to a string, so string schemas never report a type
//! failure. Lengths count characters, not bytes; `byte_len` counts UTF-8
//! bytes.

use regex::Regex;
use serde_json::{json, Value};
use valr_core::{coerce, SchemaType};
use valr_predicates::{self as predicates, IpVersion, PasswordOptions};

use crate::descriptor::{Constraint, Message};
use crate::kind::SchemaKind;
use crate::schema::Schema;

/// Marker for string schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringKind;

/// A string schema.
pub type StringSchema = Schema<StringKind>;

/// The string constraint vocabulary.
#[derive(Debug, Clone)]
pub enum StringConstraint {
    /// At least this many characters.
    Min(usize),
    /// At most this many characters.
    Max(usize),
    /// Character count within an inclusive range.
    Range(usize, usize),
    /// Exactly this many characters.
    Len(usize),
    /// UTF-8 byte count within an inclusive range.
    ByteLen(usize, usize),
    /// Equal to the given text.
    Equal(String),
    /// Contains the given text.
    Contain(String),
    /// Starts with the given text.
    StartsWith(String),
    /// Ends with the given text.
    EndsWith(String),
    /// Matches the pattern.
    Regex(Regex),
    /// Unchanged by upper-casing.
    Uppercase,
    /// Unchanged by lower-casing.
    Lowercase,
    /// ASCII letters and digits only.
    Alphanumeric,
    /// Mainland China mobile number.
    Phone,
    /// Email address.
    Email,
    /// Absolute URL.
    Url,
    /// IP address of the given version, or either.
    Ip(Option<IpVersion>),
    /// Strong password under the given minimums.
    Password(PasswordOptions),
}

impl SchemaKind for StringKind {
    type Value = String;
    type Constraint = StringConstraint;
    const TYPE: SchemaType = SchemaType::String;

    fn coerce(input: &Value) -> Option<String> {
        Some(coerce::to_string(input))
    }
}

impl Constraint<String> for StringConstraint {
    fn kind(&self) -> &'static str {
        match self {
            StringConstraint::Min(_) => "min",
            StringConstraint::Max(_) => "max",
            StringConstraint::Range(..) => "range",
            StringConstraint::Len(_) => "len",
            StringConstraint::ByteLen(..) => "byteLen",
            StringConstraint::Equal(_) => "equal",
            StringConstraint::Contain(_) => "contain",
            StringConstraint::StartsWith(_) => "startsWith",
            StringConstraint::EndsWith(_) => "endsWith",
            StringConstraint::Regex(_) => "regex",
            StringConstraint::Uppercase => "uppercase",
            StringConstraint::Lowercase => "lowercase",
            StringConstraint::Alphanumeric => "alphanumeric",
            StringConstraint::Phone => "phone",
            StringConstraint::Email => "email",
            StringConstraint::Url => "url",
            StringConstraint::Ip(_) => "ip",
            StringConstraint::Password(_) => "password",
        }
    }

    fn params(&self) -> Value {
        match self {
            StringConstraint::Min(n) | StringConstraint::Max(n) | StringConstraint::Len(n) => {
                json!(n)
            }
            StringConstraint::Range(min, max) | StringConstraint::ByteLen(min, max) => {
                json!([min, max])
            }
            StringConstraint::Equal(s)
            | StringConstraint::Contain(s)
            | StringConstraint::StartsWith(s)
            | StringConstraint::EndsWith(s) => json!(s),
            StringConstraint::Regex(re) => json!(re.as_str()),
            StringConstraint::Ip(version) => version.map_or(Value::Null, |v| json!(v.number())),
            StringConstraint::Password(options) => {
                serde_json::to_value(options).unwrap_or(Value::Null)
            }
            StringConstraint::Uppercase
            | StringConstraint::Lowercase
            | StringConstraint::Alphanumeric
            | StringConstraint::Phone
            | StringConstraint::Email
            | StringConstraint::Url => Value::Null,
        }
    }

    fn test(&self, value: &String, _input: &Value) -> bool {
        let len = || predicates::char_len(value);
        match self {
            StringConstraint::Min(n) => len() >= *n,
            StringConstraint::Max(n) => len() <= *n,
            StringConstraint::Range(min, max) => (*min..=*max).contains(&len()),
            StringConstraint::Len(n) => len() == *n,
            StringConstraint::ByteLen(min, max) => predicates::byte_len_within(value, *min, *max),
            StringConstraint::Equal(s) => value == s,
            StringConstraint::Contain(s) => value.contains(s.as_str()),
            StringConstraint::StartsWith(s) => value.starts_with(s.as_str()),
            StringConstraint::EndsWith(s) => value.ends_with(s.as_str()),
            StringConstraint::Regex(re) => re.is_match(value),
            StringConstraint::Uppercase => predicates::is_uppercase(value),
            StringConstraint::Lowercase => predicates::is_lowercase(value),
            StringConstraint::Alphanumeric => predicates::is_alphanumeric(value),
            StringConstraint::Phone => predicates::is_phone(value),
            StringConstraint::Email => predicates::is_email(value),
            StringConstraint::Url => predicates::is_url(value),
            StringConstraint::Ip(version) => predicates::is_ip(value, *version),
            StringConstraint::Password(options) => predicates::is_strong_password(value, options),
        }
    }
}

impl Schema<StringKind> {
    /// At least `n` characters.
    pub fn min(self, n: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Min(n), message)
    }

    /// At most `n` characters.
    pub fn max(self, n: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Max(n), message)
    }

    /// Between `min` and `max` characters, inclusive.
    pub fn range(self, min: usize, max: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Range(min, max), message)
    }

    /// Exactly `n` characters.
    pub fn len(self, n: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Len(n), message)
    }

    /// Between `min` and `max` UTF-8 bytes, inclusive.
    pub fn byte_len(self, min: usize, max: usize, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::ByteLen(min, max), message)
    }

    /// Exactly `expected`.
    pub fn equal(self, expected: impl Into<String>, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Equal(expected.into()), message)
    }

    /// Contains `needle`.
    pub fn contain(self, needle: impl Into<String>, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Contain(needle.into()), message)
    }

    /// Starts with `prefix`.
    pub fn starts_with(
        self,
        prefix: impl Into<String>,
        message: impl Into<Option<Message>>,
    ) -> Self {
        self.push_check(StringConstraint::StartsWith(prefix.into()), message)
    }

    /// Ends with `suffix`.
    pub fn ends_with(self, suffix: impl Into<String>, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::EndsWith(suffix.into()), message)
    }

    /// Must match `pattern` somewhere; anchor it for a full match.
    pub fn regex(self, pattern: Regex, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Regex(pattern), message)
    }

    /// No lower-case letters.
    pub fn uppercase(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Uppercase, message)
    }

    /// No upper-case letters.
    pub fn lowercase(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Lowercase, message)
    }

    /// Non-empty, ASCII letters and digits only.
    pub fn alphanumeric(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Alphanumeric, message)
    }

    /// Mainland China mobile number.
    pub fn phone(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Phone, message)
    }

    /// Email address. Leading dots and `..` are rejected.
    pub fn email(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Email, message)
    }

    /// Absolute URL with a scheme.
    pub fn url(self, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Url, message)
    }

    /// IP address; `None` accepts either version.
    pub fn ip(
        self,
        version: impl Into<Option<IpVersion>>,
        message: impl Into<Option<Message>>,
    ) -> Self {
        self.push_check(StringConstraint::Ip(version.into()), message)
    }

    /// Strong password; see [`PasswordOptions`] for the minimums.
    pub fn password(self, options: PasswordOptions, message: impl Into<Option<Message>>) -> Self {
        self.push_check(StringConstraint::Password(options), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Valr;

    fn string() -> StringSchema {
        Valr::new().string()
    }

    #[test]
    fn min_max_round_trip() {
        let schema = string().min(3, None).max(5, None);
        assert_eq!(schema.check(&json!("ab")).as_deref(), Some("字符串长度最小值为 3"));
        assert_eq!(schema.check(&json!("abc")), None);
        assert_eq!(schema.check(&json!("abcdef")).as_deref(), Some("字符串长度最大值为 5"));
    }

    #[test]
    fn length_counts_characters() {
        let schema = string().len(2, None);
        assert_eq!(schema.evaluate(&json!("中文")), None);
        let bytes = string().byte_len(1, 4, None);
        assert_eq!(
            bytes.evaluate(&json!("中文")).as_deref(),
            Some("字符串长度为 1 到 4 个字节")
        );
        assert_eq!(bytes.evaluate(&json!("abcd")), None);
    }

    #[test]
    fn range_is_inclusive() {
        let schema = string().range(2, 3, None);
        assert_eq!(schema.evaluate(&json!("ab")), None);
        assert_eq!(schema.evaluate(&json!("abc")), None);
        assert_eq!(schema.evaluate(&json!("a")).as_deref(), Some("字符串长度为 2 到 3"));
    }

    #[test]
    fn non_string_inputs_are_coerced() {
        let schema = string().len(3, None);
        assert_eq!(schema.evaluate(&json!(123)), None);
        assert_eq!(schema.evaluate(&json!(true)).as_deref(), Some("字符串长度必须等于 3"));
        assert_eq!(schema.evaluate(&json!(["a", "b"])), None);
    }

    #[test]
    fn substring_checks() {
        let schema = string().starts_with("ab", None).ends_with("yz", None).contain("m", None);
        assert_eq!(schema.evaluate(&json!("ab-m-yz")), None);
        assert_eq!(schema.evaluate(&json!("xb-m-yz")).as_deref(), Some("字符串必须以 ab 开头"));
        assert_eq!(schema.evaluate(&json!("ab-m-yx")).as_deref(), Some("字符串必须以 yz 结尾"));
        assert_eq!(schema.evaluate(&json!("ab--yz")).as_deref(), Some("字符串必须包含 m"));
        assert_eq!(
            string().equal("ok", None).evaluate(&json!("no")).as_deref(),
            Some("字符串必须等于 ok")
        );
    }

    #[test]
    fn regex_is_unanchored() {
        let re = Regex::new(r"\d+").unwrap();
        let schema = string().regex(re, None);
        assert_eq!(schema.evaluate(&json!("a1b")), None);
        assert_eq!(schema.evaluate(&json!("ab")).as_deref(), Some("请输入正确的格式"));
    }

    #[test]
    fn format_checks() {
        assert_eq!(string().email(None).evaluate(&json!("a@b.co")), None);
        assert_eq!(string().url(None).evaluate(&json!("not a url")).as_deref(), Some("链接格式不正确"));
        assert_eq!(string().phone(None).evaluate(&json!("13812345678")), None);
        assert_eq!(string().phone(None).evaluate(&json!("12812345678")).as_deref(), Some("手机号格式不正确"));
        assert_eq!(string().ip(IpVersion::V4, None).evaluate(&json!("::1")).as_deref(), Some("IP格式不正确"));
        assert_eq!(string().ip(None, None).evaluate(&json!("::1")), None);
        assert_eq!(string().uppercase(None).evaluate(&json!("ABC")), None);
        assert_eq!(string().lowercase(None).evaluate(&json!("ABC")).as_deref(), Some("字符串必须全部为小写字母"));
        assert_eq!(string().alphanumeric(None).evaluate(&json!("a-1")).as_deref(), Some("字符串必须全部为字母或数字"));
    }

    #[test]
    fn password_options() {
        let schema = string().password(PasswordOptions::default(), None);
        assert_eq!(schema.evaluate(&json!("Abcdef1!")), None);
        assert_eq!(schema.evaluate(&json!("abcdef1!")).as_deref(), Some("密码格式不正确"));

        let relaxed = PasswordOptions {
            min_symbols: 0,
            min_uppercase: 0,
            ..PasswordOptions::default()
        };
        assert_eq!(string().password(relaxed, None).evaluate(&json!("abcdefg1")), None);
    }

    #[test]
    fn message_overrides() {
        let literal = string().min(3, Message::from("至少 {0} 个字符"));
        assert_eq!(literal.evaluate(&json!("a")).as_deref(), Some("至少 {0} 个字符"));

        let func = string().max(1, Message::func(|ctx| format!("{} > {}", ctx.kind, ctx.value)));
        assert_eq!(func.evaluate(&json!("ab")).as_deref(), Some("max > 1"));
    }

    #[test]
    fn table_overrides_apply_after_build() {
        let valr = Valr::new();
        let schema = valr.string().min(2, None);
        let rules = schema.form_rules();
        valr.set_messages(json!({"string": {"min": "too short: {0}"}})).unwrap();
        assert_eq!(rules[0].run(&json!("a")).as_deref(), Some("too short: 2"));
    }

    #[test]
    fn params_shape() {
        assert_eq!(StringConstraint::Range(1, 2).params(), json!([1, 2]));
        assert_eq!(StringConstraint::Ip(Some(IpVersion::V6)).params(), json!(6));
        assert_eq!(StringConstraint::Email.params(), Value::Null);
        assert_eq!(
            StringConstraint::Password(PasswordOptions::default()).params()["minLength"],
            json!(8)
        );
    }
}

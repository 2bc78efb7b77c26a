//! Text format checks.

use std::sync::OnceLock;

use regex::Regex;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$",
        )
        .expect("static pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("static pattern compiles"))
}

/// Email address check.
///
/// The local part may not start with a dot and the address may not contain
/// consecutive dots anywhere.
pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_pattern().is_match(value)
}

/// Absolute URL check (anything the WHATWG URL parser accepts).
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Mainland China mobile number: 11 digits starting with `1[3-9]`.
pub fn is_phone(value: &str) -> bool {
    phone_pattern().is_match(value)
}

/// Non-empty and made only of ASCII letters and digits.
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Unchanged by upper-casing.
pub fn is_uppercase(value: &str) -> bool {
    value == value.to_uppercase()
}

/// Unchanged by lower-casing.
pub fn is_lowercase(value: &str) -> bool {
    value == value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(is_email("alice@example.com"));
        assert!(is_email("o'neil+tag@mail.example.org"));
        assert!(!is_email(".alice@example.com"));
        assert!(!is_email("al..ice@example.com"));
        assert!(!is_email("alice@example"));
        assert!(!is_email("alice.@example.com"));
        assert!(!is_email("ab"));
    }

    #[test]
    fn urls() {
        assert!(is_url("https://example.com/path?q=1"));
        assert!(is_url("mailto:someone@example.com"));
        assert!(!is_url("example.com"));
        assert!(!is_url(""));
    }

    #[test]
    fn phones() {
        assert!(is_phone("13800138000"));
        assert!(!is_phone("12800138000"));
        assert!(!is_phone("1380013800"));
        assert!(!is_phone("１３８００１３８０００"));
    }

    #[test]
    fn character_classes() {
        assert!(is_alphanumeric("abc123XYZ"));
        assert!(!is_alphanumeric(""));
        assert!(!is_alphanumeric("abc-123"));
        assert!(is_uppercase("ABC 1"));
        assert!(!is_uppercase("AbC"));
        assert!(is_lowercase("abc"));
        assert!(!is_lowercase("aBc"));
    }
}

//! Integer and decimal-place checks.

/// Finite with no fractional part.
pub fn is_integer(value: f64) -> bool {
    value.is_finite() && value.trunc() == value
}

/// Number of digits after the decimal point in the shortest decimal form.
pub fn decimal_places(value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let rendered = format!("{value}");
    rendered
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

/// At most `limit` digits after the decimal point.
pub fn within_decimal_places(value: f64, limit: usize) -> bool {
    decimal_places(value) <= limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn integers() {
        assert!(is_integer(3.0));
        assert!(is_integer(-0.0));
        assert!(!is_integer(3.1));
        assert!(!is_integer(f64::INFINITY));
    }

    #[test]
    fn decimals() {
        assert_eq!(decimal_places(1.25), 2);
        assert_eq!(decimal_places(10.0), 0);
        assert_eq!(decimal_places(0.1), 1);
        assert!(within_decimal_places(1.25, 2));
        assert!(!within_decimal_places(1.255, 2));
    }

    proptest! {
        #[test]
        fn whole_numbers_have_no_decimal_places(n in -1_000_000i64..1_000_000) {
            prop_assert_eq!(decimal_places(n as f64), 0);
            prop_assert!(is_integer(n as f64));
        }
    }
}

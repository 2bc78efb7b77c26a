//! Length checks.

/// Length in Unicode scalar values.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// UTF-8 byte length within `min..=max`.
///
/// ASCII characters take one byte; CJK characters take three.
pub fn byte_len_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len())
}

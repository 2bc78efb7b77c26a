//! Strong-password composition check.

use serde::{Deserialize, Serialize};

const SYMBOLS: &str = "-#!$@£%^&*()_+|~=`{}[]:\";'<>?,./\\ ";

/// Minimum counts a password must reach. Unset fields use the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordOptions {
    /// Minimum total length, in characters.
    pub min_length: usize,
    /// Minimum ASCII lowercase letters.
    pub min_lowercase: usize,
    /// Minimum ASCII uppercase letters.
    pub min_uppercase: usize,
    /// Minimum ASCII digits.
    pub min_numbers: usize,
    /// Minimum symbols.
    pub min_symbols: usize,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_lowercase: 1,
            min_uppercase: 1,
            min_numbers: 1,
            min_symbols: 1,
        }
    }
}

#[derive(Debug, Default)]
struct Composition {
    length: usize,
    lowercase: usize,
    uppercase: usize,
    numbers: usize,
    symbols: usize,
}

fn analyze(password: &str) -> Composition {
    let mut c = Composition::default();
    for ch in password.chars() {
        c.length += 1;
        if ch.is_ascii_uppercase() {
            c.uppercase += 1;
        } else if ch.is_ascii_lowercase() {
            c.lowercase += 1;
        } else if ch.is_ascii_digit() {
            c.numbers += 1;
        } else if SYMBOLS.contains(ch) {
            c.symbols += 1;
        }
    }
    c
}

/// Whether `password` satisfies every minimum in `options`.
pub fn is_strong_password(password: &str, options: &PasswordOptions) -> bool {
    let c = analyze(password);
    c.length >= options.min_length
        && c.lowercase >= options.min_lowercase
        && c.uppercase >= options.min_uppercase
        && c.numbers >= options.min_numbers
        && c.symbols >= options.min_symbols
}

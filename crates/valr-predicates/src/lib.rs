//! # valr-predicates: Predicate Set
//!
//! Pure `(value, params) -> bool` checks used by the concrete schema types.
//! Nothing here knows about descriptors, messages, or rules: a predicate
//! answers one question about one already-coerced value.
//!
//! ## Modules
//!
//! - [`format`]: email, url, phone, alphanumeric, letter case.
//! - [`network`]: IP addresses and port numbers.
//! - [`numeric`]: integers and decimal places.
//! - [`password`]: strong-password composition rules.
//! - [`text`]: length measured in characters or UTF-8 bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `valr-*` crates.
//! - Every function is total: no panics for any input.

pub mod format;
pub mod network;
pub mod numeric;
pub mod password;
pub mod text;

pub use format::{is_alphanumeric, is_email, is_lowercase, is_phone, is_uppercase, is_url};
pub use network::{is_ip, is_port, IpVersion};
pub use numeric::{decimal_places, is_integer, within_decimal_places};
pub use password::{is_strong_password, PasswordOptions};
pub use text::{byte_len_within, char_len};

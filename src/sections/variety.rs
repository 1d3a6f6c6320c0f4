//! Character variety sections - lowercase, uppercase, digits, symbols.
//!
//! Classes are ASCII ranges: anything outside `[a-zA-Z0-9]` is a symbol,
//! accented letters included.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

fn contains(password: &SecretString, class: impl Fn(char) -> bool) -> bool {
    password.expose_secret().chars().any(class)
}

pub fn lowercase_section(password: &SecretString) -> SectionResult {
    if contains(password, |c| c.is_ascii_lowercase()) {
        None
    } else {
        Some("Missing: lowercase")
    }
}

pub fn uppercase_section(password: &SecretString) -> SectionResult {
    if contains(password, |c| c.is_ascii_uppercase()) {
        None
    } else {
        Some("Missing: uppercase")
    }
}

pub fn digit_section(password: &SecretString) -> SectionResult {
    if contains(password, |c| c.is_ascii_digit()) {
        None
    } else {
        Some("Missing: numbers")
    }
}

pub fn symbol_section(password: &SecretString) -> SectionResult {
    if contains(password, |c| !c.is_ascii_alphanumeric()) {
        None
    } else {
        Some("Missing: special characters")
    }
}

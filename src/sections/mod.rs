//! Password strength sections
//!
//! Each section checks one predicate of the strength score.

mod length;
mod variety;

pub use length::length_section;
pub use variety::{digit_section, lowercase_section, symbol_section, uppercase_section};

/// Result type for section evaluation functions.
/// - `Some(reason)` - Section not satisfied, with reason
/// - `None` - Section satisfied
pub type SectionResult = Option<&'static str>;

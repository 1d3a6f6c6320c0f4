//! Password strength evaluator - score and indicator mapping.

use secrecy::SecretString;

use crate::page::Element;
use crate::sections::{
    SectionResult, digit_section, length_section, lowercase_section, symbol_section,
    uppercase_section,
};

const STRENGTH_LABELS: [&str; 5] = ["Very Weak", "Weak", "Fair", "Good", "Strong"];
const STRENGTH_COLORS: [&str; 5] = ["danger", "warning", "info", "success", "success"];
const NEUTRAL_COLOR: &str = "secondary";

/// Number of satisfied sections, `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrengthScore(u8);

impl StrengthScore {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Severity label; empty for a score of zero.
    pub fn label(&self) -> &'static str {
        self.slot().map(|i| STRENGTH_LABELS[i]).unwrap_or("")
    }

    pub fn color(&self) -> &'static str {
        self.slot().map(|i| STRENGTH_COLORS[i]).unwrap_or(NEUTRAL_COLOR)
    }

    /// Class applied to the indicator badge.
    pub fn badge_class(&self) -> String {
        format!("badge bg-{}", self.color())
    }

    fn slot(&self) -> Option<usize> {
        (self.0 as usize)
            .checked_sub(1)
            .filter(|i| *i < STRENGTH_LABELS.len())
    }
}

/// Score plus the reason of every unmet section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthEvaluation {
    pub score: StrengthScore,
    pub reasons: Vec<String>,
}

/// Evaluates password strength.
///
/// # Arguments
/// * `password` - The password to evaluate
///
/// # Returns
/// A `StrengthEvaluation` with one point per satisfied section.
pub fn evaluate_password_strength(password: &SecretString) -> StrengthEvaluation {
    // Orchestrator: execute sections in sequence
    let sections: [(&str, fn(&SecretString) -> SectionResult); 5] = [
        ("length", length_section),
        ("lowercase", lowercase_section),
        ("uppercase", uppercase_section),
        ("digit", digit_section),
        ("symbol", symbol_section),
    ];

    let mut satisfied = 0u8;
    let mut reasons = Vec::new();
    for (section_name, section_fn) in sections {
        let result = section_fn(password);

        #[cfg(feature = "tracing")]
        tracing::trace!(section = section_name, passed = result.is_none(), "strength section");
        #[cfg(not(feature = "tracing"))]
        let _ = section_name;

        match result {
            Some(reason) => reasons.push(reason.to_string()),
            None => satisfied += 1,
        }
    }

    StrengthEvaluation {
        score: StrengthScore::new(satisfied),
        reasons,
    }
}

/// Shorthand for the bare score.
pub fn check_password_strength(password: &SecretString) -> StrengthScore {
    evaluate_password_strength(password).score
}

/// Keeps the `password-strength` badge in sync with the `password` input.
#[derive(Debug, Clone)]
pub struct PasswordStrengthMeter {
    input: Element,
    indicator: Option<Element>,
}

impl PasswordStrengthMeter {
    pub fn new(input: Element, indicator: Option<Element>) -> Self {
        Self { input, indicator }
    }

    /// Input handler: re-scores the current value.
    pub fn on_input(&self) -> StrengthScore {
        let password = SecretString::new(self.input.value().into());
        let score = check_password_strength(&password);
        if let Some(indicator) = &self.indicator {
            indicator.set_text_content(score.label());
            indicator.set_class_name(&score.badge_class());
        }
        score
    }
}

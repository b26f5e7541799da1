//! Password complexity policy.

use std::fmt;

use crate::config::PasswordPolicyConfig;

/// A single complexity rule a candidate password failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    TooShort { min: usize },
    TooLong { max: usize },
    /// Letters only, or letters and digits only.
    OnlyAlphanumeric,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecial { allowed: String },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::TooShort { min } => write!(f, "shorter than {} characters", min),
            PolicyViolation::TooLong { max } => write!(f, "longer than {} characters", max),
            PolicyViolation::OnlyAlphanumeric => write!(f, "contains only letters and digits"),
            PolicyViolation::MissingUppercase => write!(f, "no uppercase letter"),
            PolicyViolation::MissingLowercase => write!(f, "no lowercase letter"),
            PolicyViolation::MissingDigit => write!(f, "no digit"),
            PolicyViolation::MissingSpecial { allowed } => {
                write!(f, "no special character from {}", allowed)
            }
        }
    }
}

/// Complexity rules applied to new passwords.
///
/// Lengths count characters, not bytes. Characters outside letters, digits and
/// `special_chars` are allowed but satisfy no requirement.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub special_chars: String,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from(&PasswordPolicyConfig::default())
    }
}

impl From<&PasswordPolicyConfig> for PasswordPolicy {
    fn from(config: &PasswordPolicyConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            special_chars: config.special_chars.clone(),
        }
    }
}

impl PasswordPolicy {
    /// True only if every rule passes.
    pub fn validate(&self, candidate: &str) -> bool {
        self.violations(candidate).is_empty()
    }

    /// Every rule `candidate` fails, in rule order.
    pub fn violations(&self, candidate: &str) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        if !candidate.is_empty() && candidate.chars().all(char::is_alphanumeric) {
            violations.push(PolicyViolation::OnlyAlphanumeric);
        }

        let length = candidate.chars().count();
        if length < self.min_length {
            violations.push(PolicyViolation::TooShort { min: self.min_length });
        }
        if length > self.max_length {
            violations.push(PolicyViolation::TooLong { max: self.max_length });
        }

        if !candidate.chars().any(char::is_uppercase) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        if !candidate.chars().any(char::is_lowercase) {
            violations.push(PolicyViolation::MissingLowercase);
        }
        if !candidate.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }
        if !candidate.chars().any(|c| self.special_chars.contains(c)) {
            violations.push(PolicyViolation::MissingSpecial {
                allowed: self.special_chars.clone(),
            });
        }

        violations
    }
}

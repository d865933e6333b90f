//! Email and password checks used by the login and register forms.

use crate::AuthError;
use serde::{Deserialize, Serialize};

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Check that an email looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Password strength rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordStrength::VeryWeak => "very weak",
            PasswordStrength::Weak => "weak",
            PasswordStrength::Medium => "medium",
            PasswordStrength::Strong => "strong",
        }
    }
}

/// Which strength criteria a password meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCheck {
    pub min_length: bool,
    pub has_letter: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordCheck {
    pub fn new(password: &str) -> Self {
        Self {
            min_length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            has_letter: password.chars().any(|c| c.is_ascii_alphabetic()),
            has_digit: password.chars().any(|c| c.is_ascii_digit()),
            has_special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        }
    }

    /// Number of criteria met, 0 to 4.
    pub fn score(&self) -> u8 {
        [self.min_length, self.has_letter, self.has_digit, self.has_special]
            .iter()
            .filter(|met| **met)
            .count() as u8
    }

    pub fn strength(&self) -> PasswordStrength {
        match self.score() {
            0 | 1 => PasswordStrength::VeryWeak,
            2 => PasswordStrength::Weak,
            3 => PasswordStrength::Medium,
            _ => PasswordStrength::Strong,
        }
    }
}

/// Rate a password.
pub fn password_strength(password: &str) -> PasswordStrength {
    PasswordCheck::new(password).strength()
}

/// Validate password requirements for registration.
///
/// At least eight characters with a letter and a digit.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let check = PasswordCheck::new(password);
    if !check.min_length {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !check.has_letter || !check.has_digit {
        return Err(AuthError::WeakPassword(
            "password must contain a letter and a digit".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("amine@example.dz"));
        assert!(validate_email("  a.b+tag@mail.example.com "));
        assert!(!validate_email(""));
        assert!(!validate_email("no-at-sign.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("a@localhost"));
        assert!(!validate_email("a@b@c.com"));
        assert!(!validate_email("a b@c.com"));
        assert!(!validate_email("a@example."));
    }

    #[test]
    fn test_password_strength_levels() {
        assert_eq!(password_strength(""), PasswordStrength::VeryWeak);
        assert_eq!(password_strength("abc"), PasswordStrength::VeryWeak);
        assert_eq!(password_strength("abc123"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdef123"), PasswordStrength::Medium);
        assert_eq!(password_strength("abcdef12!"), PasswordStrength::Strong);
    }

    #[test]
    fn test_password_check_score() {
        let check = PasswordCheck::new("12345678");
        assert!(check.min_length);
        assert!(check.has_digit);
        assert!(!check.has_letter);
        assert_eq!(check.score(), 2);
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("letters123").is_ok());
    }
}

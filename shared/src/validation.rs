//! Client-side validation. Every check here runs before any network call.

use std::collections::BTreeMap;

use thiserror::Error;

/// Minimum password length accepted by the change-password dialogs.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(String),
    #[error("{0} must be a number between 0 and 100")]
    ScoreOutOfRange(String),
    #[error("Please enter both class score and exam score")]
    MissingSystemScores,
    #[error("Please enter total score")]
    MissingManualScore,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("End date must be after start date")]
    DateOrder,
    #[error("{field} must be within the academic year range: {start} to {end}")]
    DateOutsideYear {
        field: String,
        start: String,
        end: String,
    },
    #[error("End date cannot exceed academic year end date: {0}")]
    EndExceedsYear(String),
    #[error("{0} must be a number")]
    NotANumber(String),
    #[error("{0} is not a valid date")]
    InvalidDate(String),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please fill all required fields")]
    IncompleteSelection,
}

/// Inline, per-field error messages for a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, error: &ValidationError) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| error.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message, used as the toast text when submission is blocked.
    pub fn first_message(&self) -> Option<&str> {
        self.errors.values().next().map(String::as_str)
    }
}

/// Whitespace-only counts as missing.
pub fn require(label: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(label.to_string()));
    }
    Ok(())
}

pub fn validate_password_change(new_password: &str, confirm: &str) -> Result<(), ValidationError> {
    if new_password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// One point each for length, mixed case, a digit and a symbol. Zero and one
/// point both read as weak.
pub fn password_strength(password: &str) -> PasswordStrength {
    let mut points = 0;
    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        points += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
    {
        points += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        points += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        points += 1;
    }
    match points {
        0 | 1 => PasswordStrength::Weak,
        2 => PasswordStrength::Fair,
        3 => PasswordStrength::Good,
        _ => PasswordStrength::Strong,
    }
}

/// `local@domain.tld` with no whitespace, matching the create-admin form.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_missing() {
        assert_eq!(require("Name", " \t "), Err(ValidationError::Required("Name".to_string())));
        assert_eq!(require("Name", " Ama "), Ok(()));
    }

    #[test]
    fn password_change_checks_match_before_length() {
        assert_eq!(
            validate_password_change("short", "other"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_password_change("short", "short"),
            Err(ValidationError::PasswordTooShort(8))
        );
        assert!(validate_password_change("Longenough1", "Longenough1").is_ok());
    }

    #[test]
    fn password_strength_levels() {
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh1"), PasswordStrength::Fair);
        assert_eq!(password_strength("Abcdefgh1"), PasswordStrength::Good);
        assert_eq!(password_strength("Abcdefgh1!"), PasswordStrength::Strong);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("admin@school.edu"));
        assert!(!is_valid_email("admin@school"));
        assert!(!is_valid_email("ad min@school.edu"));
        assert!(!is_valid_email("@school.edu"));
    }

    #[test]
    fn field_errors_keep_first_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.insert("name", &ValidationError::Required("Name".into()));
        errors.insert("name", &ValidationError::InvalidEmail);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.first_message(), Some("Name is required"));
    }
}

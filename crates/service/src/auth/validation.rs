//! Input checks for registration.
//!
//! Everything here is pure and synchronous. Each check reports only the first
//! problem it finds, in a fixed order, so clients always see the same message
//! for the same input.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::domain::RegisterInput;

/// Deliberately loose `local@domain.tld` shape check, not RFC 5322.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

const COMMON_PASSWORDS: [&str; 7] = ["password", "123456", "qwerty", "admin", "letmein", "welcome", "monkey"];

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum length in UTF-16 code units, so a character outside the Basic
/// Multilingual Plane (most emoji) counts twice.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Please provide a valid email address.")]
    InvalidEmail,
    #[error("{0}")]
    WeakPassword(PasswordRule),
}

/// Password policy rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordRule {
    #[error("Password is too common, please choose a stronger password.")]
    TooCommon,
    #[error("Password must be at least 8 characters long.")]
    TooShort,
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
    #[error("Password must contain at least one number.")]
    MissingDigit,
    #[error("Password must contain at least one special character.")]
    MissingSpecial,
}

/// Returns the value when present and not blank.
pub fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Required(field)),
    }
}

/// Fails on the first field, in the given order, that is missing, null or
/// whitespace-only.
pub fn validate_required_fields(fields: &[(&'static str, Option<&str>)]) -> Result<(), ValidationError> {
    for (field, value) in fields {
        required(*field, *value)?;
    }
    Ok(())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Checks the password policy and returns the first rule that fails.
///
/// The common-password check matches in both directions: a candidate that
/// contains a listed word fails, and so does a candidate that is itself a
/// substring of a listed word (so `"admi"` is rejected as too common before
/// the length rule runs).
pub fn check_password_strength(password: &str) -> Result<(), PasswordRule> {
    let lower = password.to_lowercase();
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| lower.contains(weak) || weak.contains(lower.as_str()))
    {
        return Err(PasswordRule::TooCommon);
    }
    if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(PasswordRule::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordRule::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordRule::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRule::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(PasswordRule::MissingSpecial);
    }
    Ok(())
}

/// Registration input that passed every check. The email is lowercased.
#[derive(Clone)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for ValidRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Runs the registration checks: required fields (name, email, password),
/// then email shape, then password policy.
pub fn validate_registration(input: &RegisterInput) -> Result<ValidRegistration, ValidationError> {
    let name = required("name", input.name.as_deref())?;
    let email = required("email", input.email.as_deref())?;
    let password = required("password", input.password.as_deref())?;

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    check_password_strength(password).map_err(ValidationError::WeakPassword)?;

    Ok(ValidRegistration {
        name: name.to_string(),
        email: email.to_lowercase(),
        password: password.to_string(),
    })
}

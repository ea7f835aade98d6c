//! Input validation helpers
//!
//! Centralized text length limits and the checks shared by every form.
//! Forms map the resulting [`FieldError`]s to their own translated messages.

use shared::form::{FieldError, optional_text};
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, service, staff, customer
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, bios, contact messages
pub const MAX_NOTE_LEN: usize = 2000;

/// Phone numbers, categories, brands
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Minimum password length accepted by the auth service
pub const MIN_PASSWORD_LEN: usize = 6;

// ── Helpers ─────────────────────────────────────────────────────────

/// Trimmed, non-empty text within `max_len` characters
pub fn required_text(value: &str, max_len: usize) -> Result<String, FieldError> {
    let text = optional_text(value).ok_or(FieldError::Required)?;
    check_len(text, max_len)
}

/// Trimmed text within `max_len` characters; blank is `None`
pub fn optional_text_max(value: &str, max_len: usize) -> Result<Option<String>, FieldError> {
    optional_text(value)
        .map(|text| check_len(text, max_len))
        .transpose()
}

fn check_len(text: String, max_len: usize) -> Result<String, FieldError> {
    if text.chars().count() > max_len {
        return Err(FieldError::OutOfRange {
            min: "1".to_string(),
            max: max_len.to_string(),
        });
    }
    Ok(text)
}

/// Trimmed, syntactically valid email address
pub fn email(value: &str) -> Result<String, FieldError> {
    let text = required_text(value, MAX_EMAIL_LEN)?;
    if !text.as_str().validate_email() {
        return Err(FieldError::InvalidEmail(text));
    }
    Ok(text)
}

/// Password long enough for the auth service (not trimmed)
pub fn password(value: &str) -> Result<&str, FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::OutOfRange {
            min: MIN_PASSWORD_LEN.to_string(),
            max: "128".to_string(),
        });
    }
    Ok(value)
}

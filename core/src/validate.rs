//! Input validation for submission and event creation.
//!
//! Basic RFC 5322-ish email validation; for full compliance consider the
//! `email_address` crate.

use crate::error::{AdmissionError, Result};

/// Validate email address format.
///
/// - Must contain exactly one `@`
/// - Local and domain parts must be non-empty
/// - Domain must contain at least one dot
/// - Length must be between 3 and 255 characters
///
/// # Examples
///
/// ```
/// use gatehouse_core::validate::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    local.chars().all(valid_local) && domain.chars().all(valid_domain)
}

/// Trim a required field, rejecting values that are empty afterwards.
///
/// # Errors
///
/// Returns [`AdmissionError::Validation`] naming the field when the trimmed
/// value is empty.
pub fn required_trimmed(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdmissionError::validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalise and validate an attendee email.
///
/// The result is trimmed and lowercased; it is the dedup key within an
/// event, so normalisation must happen before any lookup or insert.
///
/// # Errors
///
/// Returns [`AdmissionError::Validation`] when the address is empty or not
/// syntactically valid.
pub fn normalized_email(value: &str) -> Result<String> {
    let email = required_trimmed("email", value)?.to_lowercase();
    if !is_valid_email(&email) {
        return Err(AdmissionError::validation("email is not a valid address"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn trims_and_rejects_empty() {
        assert_eq!(required_trimmed("name", "  Ada  ").unwrap(), "Ada");
        assert!(matches!(
            required_trimmed("name", "   "),
            Err(AdmissionError::Validation { .. })
        ));
    }

    #[test]
    fn normalises_email_case() {
        assert_eq!(
            normalized_email(" Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "plain", "a@b", "two@@example.com", "user@", "@x.com"] {
            assert!(
                matches!(normalized_email(bad), Err(AdmissionError::Validation { .. })),
                "accepted: {bad}"
            );
        }
    }
}

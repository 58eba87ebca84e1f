//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::AppError;
use shared::models::AttributeInput;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, subcategory, attribute
pub const MAX_NAME_LEN: usize = 200;

/// Product descriptions
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Short identifiers: phone numbers, city names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Buyer delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Photos attached to a single product
pub const MAX_PHOTOS: usize = 20;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate the names of nested attribute definitions
pub fn validate_attribute_inputs(inputs: &[AttributeInput]) -> Result<(), AppError> {
    for input in inputs {
        validate_required_text(&input.name, "attribute name", MAX_NAME_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Phones", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "image", MAX_URL_LEN).is_ok());
        assert!(validate_optional_text(&Some("a".into()), "image", 1).is_ok());
        assert!(validate_optional_text(&Some("ab".into()), "image", 1).is_err());
    }
}

//! Short code generation and validation.
//!
//! Generated codes are fixed-length alphanumeric draws; uniqueness is advisory
//! at generation time and enforced by the database constraint at insert.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of system-generated short codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Codes reserved for service endpoints, rejected as custom codes.
const RESERVED_CODES: &[&str] = &["api", "health", "static", "admin"];

/// Draws a random alphanumeric short code of [`GENERATED_CODE_LENGTH`] chars.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: letters, digits, hyphens, underscores
/// - Cannot be a reserved system code
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < 3 || code.len() > 20 {
        return Err(AppError::validation(
            "Custom code must be 3-20 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::validation(
            "Custom code can only contain letters, digits, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::validation(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

//! Short code generation and validation.

use crate::domain::reserved_paths::ReservedPaths;
use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Maximum length of any short code.
pub const MAX_CODE_LENGTH: usize = 50;

/// URL-path-safe code charset, 1 to 50 characters.
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,50}$").unwrap());

/// Generates a random 6-character alphanumeric code.
///
/// Uniqueness is not checked here; the store's unique constraint decides.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns true if `code` has a valid short-code shape.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Validates a caller-chosen short code.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Must not start with a reserved path prefix
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str, reserved: &ReservedPaths) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Short code must be 1-50 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !is_valid_code(code) {
        return Err(AppError::bad_request(
            "Short code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if reserved.is_reserved(code) {
        return Err(AppError::bad_request(
            "Short code starts with a reserved prefix",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

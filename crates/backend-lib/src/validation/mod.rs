// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for credentials.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Minimum password length, counted in UTF-16 code units
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Anything but '@' and the ECMAScript whitespace set, which is not the
// same as Unicode White_Space (U+FEFF is in, U+0085 is out)
const SEGMENT_CHAR: &str = concat!(
    r"[^\t\n\x0B\x0C\r \x{00A0}\x{1680}\x{2000}-\x{200A}",
    r"\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}@]",
);

// local@domain.tld
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{c}+@{c}+\.{c}+$", c = SEGMENT_CHAR)).expect("email pattern compiles")
});

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    WeakPassword,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if EMAIL_REGEX.is_match(email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validate a password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() || password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword);
    }
    Ok(password)
}

/// Key under which an account is stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

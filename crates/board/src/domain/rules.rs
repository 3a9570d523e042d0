//! Field Validation Rules
//!
//! Simple predicate-style checks over raw form fields, consumed by the
//! sign-up/posting flows before anything reaches storage. Bounds count
//! characters, not bytes.

use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for a user name (in characters)
pub const USERNAME_MIN_LENGTH: usize = 1;

/// Maximum length for a user name (in characters)
pub const USERNAME_MAX_LENGTH: usize = 24;

/// Maximum length for a password
pub const PASSWORD_MAX_LENGTH: usize = 144;

/// Maximum length for a post title
pub const TITLE_MAX_LENGTH: usize = 255;

/// Maximum length for post/comment content
pub const CONTENT_MAX_LENGTH: usize = 65535;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when a field fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleError {
    NameBadLength,
    NameBadCharacter,
    PasswordBadLength,
    PasswordBadCharacter,
    TitleBadLength,
    TitleBadCharacter,
    ContentBadLength,
    ContentBadCharacter,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameBadLength => write!(
                f,
                "username length must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            ),
            Self::NameBadCharacter => {
                write!(f, "username can only contain letters, numbers and underscore")
            }
            Self::PasswordBadLength => write!(
                f,
                "password length must be between 1 and {PASSWORD_MAX_LENGTH} characters"
            ),
            Self::PasswordBadCharacter => write!(f, "disallowed content in password"),
            Self::TitleBadLength => write!(
                f,
                "title length must be between 1 and {TITLE_MAX_LENGTH} characters"
            ),
            Self::TitleBadCharacter => write!(f, "disallowed content in title"),
            Self::ContentBadLength => write!(
                f,
                "content length must be between 1 and {CONTENT_MAX_LENGTH} characters"
            ),
            Self::ContentBadCharacter => write!(f, "disallowed content in content"),
        }
    }
}

impl std::error::Error for RuleError {}

// ============================================================================
// Predicates
// ============================================================================

/// Length must be between 1 and 24 chars, only letters, numbers and underscores
pub fn validate_username(name: &str) -> Result<(), RuleError> {
    let length = name.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        return Err(RuleError::NameBadLength);
    }
    for c in name.chars() {
        if !(c.is_alphanumeric() || c == '_') {
            return Err(RuleError::NameBadCharacter);
        }
    }
    Ok(())
}

/// Non-empty, bounded length, no control characters
pub fn validate_password(password: &str) -> Result<(), RuleError> {
    let length = password.chars().count();
    if !(1..=PASSWORD_MAX_LENGTH).contains(&length) {
        return Err(RuleError::PasswordBadLength);
    }
    if password.chars().any(char::is_control) {
        return Err(RuleError::PasswordBadCharacter);
    }
    Ok(())
}

/// Non-empty, bounded length, no control characters
pub fn validate_title(title: &str) -> Result<(), RuleError> {
    let length = title.chars().count();
    if !(1..=TITLE_MAX_LENGTH).contains(&length) {
        return Err(RuleError::TitleBadLength);
    }
    if title.chars().any(char::is_control) {
        return Err(RuleError::TitleBadCharacter);
    }
    Ok(())
}

/// Non-empty, bounded length, no control characters
pub fn validate_content(content: &str) -> Result<(), RuleError> {
    let length = content.chars().count();
    if !(1..=CONTENT_MAX_LENGTH).contains(&length) {
        return Err(RuleError::ContentBadLength);
    }
    if content.chars().any(char::is_control) {
        return Err(RuleError::ContentBadCharacter);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

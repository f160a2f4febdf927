//! Login form validation and identity-provider outcome messages.

use crate::verification::MSG_FILL_ALL_FIELDS;

/// Returned for any credential mismatch on both the admin and agent paths.
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";

pub const MSG_TOO_MANY_ATTEMPTS: &str = "Too many failed login attempts. Please try again later.";

pub const MSG_NETWORK_FAILURE: &str = "Network error. Please check your connection.";

/// Consecutive failed admin sign-ins before the account is locked.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a locked admin account stays locked.
pub const LOCK_DURATION_MINS: i64 = 15;

/// Failure categories reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityErrorCode {
    /// Unknown user, wrong password, or malformed credential.
    InvalidCredential,
    /// The provider is throttling this account.
    TooManyRequests,
    /// The provider could not be reached or failed internally.
    NetworkRequestFailed,
}

impl IdentityErrorCode {
    /// User-facing copy for the failure.
    pub fn user_message(self) -> &'static str {
        match self {
            IdentityErrorCode::InvalidCredential => MSG_INVALID_CREDENTIALS,
            IdentityErrorCode::TooManyRequests => MSG_TOO_MANY_ATTEMPTS,
            IdentityErrorCode::NetworkRequestFailed => MSG_NETWORK_FAILURE,
        }
    }
}

/// Both fields are required; nothing else is checked before the lookup.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(MSG_FILL_ALL_FIELDS.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_rejected() {
        assert_eq!(validate_credentials("", "pw").unwrap_err(), MSG_FILL_ALL_FIELDS);
        assert_eq!(
            validate_credentials("a@b.com", "").unwrap_err(),
            MSG_FILL_ALL_FIELDS
        );
        assert!(validate_credentials("a@b.com", "pw").is_ok());
    }

    #[test]
    fn test_provider_codes_have_distinct_copy() {
        assert_eq!(
            IdentityErrorCode::InvalidCredential.user_message(),
            "Invalid email or password"
        );
        assert!(IdentityErrorCode::TooManyRequests
            .user_message()
            .starts_with("Too many failed login attempts"));
        assert!(IdentityErrorCode::NetworkRequestFailed
            .user_message()
            .starts_with("Network error"));
    }
}

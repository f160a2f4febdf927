//! Agent verification request statuses and signup form validation.
//!
//! A signup produces a `pending` verification request. An admin approval
//! turns it into an agent and removes it; a rejection removes it outright.

/// Request is awaiting an admin decision.
pub const VERIFICATION_PENDING: &str = "pending";

/// Request was approved (transient; the row is removed once the agent exists).
pub const VERIFICATION_APPROVED: &str = "approved";

/// Request was rejected (transient; the row is removed in the same operation).
pub const VERIFICATION_REJECTED: &str = "rejected";

/// All valid verification statuses.
pub const VALID_VERIFICATION_STATUSES: &[&str] = &[
    VERIFICATION_PENDING,
    VERIFICATION_APPROVED,
    VERIFICATION_REJECTED,
];

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_ACCEPT_TERMS: &str = "Please accept the Terms & Policies";

/// The fields of an agent signup form, borrowed from the request body.
#[derive(Debug, Clone, Copy)]
pub struct SignupFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub accepted_terms: bool,
}

/// Validate that a status string is one of the accepted values.
pub fn validate_verification_status(status: &str) -> Result<(), String> {
    if VALID_VERIFICATION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid verification status '{status}'. Must be one of: {}",
            VALID_VERIFICATION_STATUSES.join(", ")
        ))
    }
}

/// Validate a signup form.
///
/// Checks run in a fixed order and the first failure wins: every field must
/// be non-blank (whitespace-only counts as missing, since names are stored
/// trimmed), the password confirmation must match, and the terms must be
/// accepted. Passwords are compared exactly as typed.
pub fn validate_signup(fields: &SignupFields<'_>) -> Result<(), String> {
    let required = [
        fields.first_name,
        fields.last_name,
        fields.email,
        fields.phone,
        fields.password,
        fields.confirm_password,
    ];
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(MSG_FILL_ALL_FIELDS.to_string());
    }
    if fields.password != fields.confirm_password {
        return Err(MSG_PASSWORD_MISMATCH.to_string());
    }
    if !fields.accepted_terms {
        return Err(MSG_ACCEPT_TERMS.to_string());
    }
    Ok(())
}

/// Join the optional dial prefix and the local number the way the signup
/// form stores them (no separator).
pub fn compose_phone(country_code: Option<&str>, phone: &str) -> String {
    let code = country_code.map(str::trim).unwrap_or_default();
    format!("{code}{}", phone.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SignupFields<'static> {
        SignupFields {
            first_name: "A",
            last_name: "B",
            email: "a@b.com",
            phone: "+15551234567",
            password: "x",
            confirm_password: "x",
            accepted_terms: true,
        }
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate_signup(&valid()).is_ok());
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        let blanks: [fn(&mut SignupFields<'static>); 6] = [
            |f| f.first_name = "",
            |f| f.last_name = " ",
            |f| f.email = "",
            |f| f.phone = "",
            |f| f.password = "",
            |f| f.confirm_password = "",
        ];
        for blank in blanks {
            let mut fields = valid();
            blank(&mut fields);
            assert_eq!(validate_signup(&fields).unwrap_err(), MSG_FILL_ALL_FIELDS);
        }
    }

    #[test]
    fn test_whitespace_only_fields_count_as_missing() {
        let fields = SignupFields {
            first_name: "   ",
            ..valid()
        };
        assert_eq!(validate_signup(&fields).unwrap_err(), MSG_FILL_ALL_FIELDS);

        let fields = SignupFields {
            password: " ",
            confirm_password: " ",
            ..valid()
        };
        assert_eq!(validate_signup(&fields).unwrap_err(), MSG_FILL_ALL_FIELDS);
    }

    #[test]
    fn test_password_mismatch_is_rejected() {
        let fields = SignupFields {
            confirm_password: "y",
            ..valid()
        };
        assert_eq!(validate_signup(&fields).unwrap_err(), MSG_PASSWORD_MISMATCH);
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let fields = SignupFields {
            accepted_terms: false,
            ..valid()
        };
        assert_eq!(validate_signup(&fields).unwrap_err(), MSG_ACCEPT_TERMS);
    }

    #[test]
    fn test_missing_field_reported_before_mismatch() {
        let fields = SignupFields {
            first_name: "",
            confirm_password: "y",
            accepted_terms: false,
            ..valid()
        };
        assert_eq!(validate_signup(&fields).unwrap_err(), MSG_FILL_ALL_FIELDS);
    }

    #[test]
    fn test_compose_phone() {
        assert_eq!(compose_phone(Some("+91"), "9876543210"), "+919876543210");
        assert_eq!(compose_phone(None, "+15551234567"), "+15551234567");
    }

    #[test]
    fn test_status_validation() {
        assert!(validate_verification_status(VERIFICATION_PENDING).is_ok());
        assert!(validate_verification_status("archived").is_err());
    }
}

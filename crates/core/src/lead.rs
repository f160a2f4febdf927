//! Lead statuses, processing-volume options, and lead form validation.

use serde::Serialize;

use crate::contact::{is_valid_email, is_valid_phone};

/// Default (and currently only) status of a captured lead.
pub const LEAD_STATUS_NEW: &str = "new";

pub const VOLUME_UNDER_25K: &str = "Under $25,000/Month";
pub const VOLUME_OVER_25K: &str = "Over $25,000/Month";

/// Monthly credit processing volume options, in display order.
pub const PROCESSING_VOLUME_OPTIONS: &[&str] = &[VOLUME_UNDER_25K, VOLUME_OVER_25K];

pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address";
pub const MSG_INVALID_PHONE: &str = "Please enter a valid phone number (minimum 10 digits)";
pub const MSG_SELECT_VOLUME: &str = "Please select Credit Processing Volume";

/// The fields of a lead form, borrowed from the request body.
#[derive(Debug, Clone, Copy)]
pub struct LeadFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub business_name: &'a str,
    pub phone: &'a str,
    pub email_address: &'a str,
    pub credit_processing_volume: &'a str,
}

/// Validate a lead form.
///
/// Required fields are checked in form order, then the email and phone
/// shapes, then the processing volume selection. The first failure wins.
/// Zip code and notes are optional and not checked.
pub fn validate_lead(fields: &LeadFields<'_>) -> Result<(), String> {
    let required = [
        ("First Name", fields.first_name),
        ("Last Name", fields.last_name),
        ("Business Name", fields.business_name),
        ("Phone number", fields.phone),
        ("Email Address", fields.email_address),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(format!("{label} is required"));
        }
    }

    if !is_valid_email(fields.email_address) {
        return Err(MSG_INVALID_EMAIL.to_string());
    }
    if !is_valid_phone(fields.phone) {
        return Err(MSG_INVALID_PHONE.to_string());
    }

    let volume = fields.credit_processing_volume.trim();
    if volume.is_empty() {
        return Err(MSG_SELECT_VOLUME.to_string());
    }
    if !PROCESSING_VOLUME_OPTIONS.contains(&volume) {
        return Err(format!(
            "Invalid Credit Processing Volume '{volume}'. Must be one of: {}",
            PROCESSING_VOLUME_OPTIONS.join(", ")
        ));
    }
    Ok(())
}

/// Counters shown above an agent's lead list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeadSummary {
    pub total: usize,
    pub new_count: usize,
}

/// Count leads overall and those still in the `new` status.
pub fn summarize<'a, I>(statuses: I) -> LeadSummary
where
    I: IntoIterator<Item = &'a str>,
{
    statuses
        .into_iter()
        .fold(LeadSummary::default(), |mut summary, status| {
            summary.total += 1;
            if status == LEAD_STATUS_NEW {
                summary.new_count += 1;
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LeadFields<'static> {
        LeadFields {
            first_name: "Grace",
            last_name: "Hopper",
            business_name: "Cobol Cafe",
            phone: "(555) 123-4567",
            email_address: "grace@cobol.cafe",
            credit_processing_volume: VOLUME_OVER_25K,
        }
    }

    #[test]
    fn test_valid_lead_passes() {
        assert!(validate_lead(&valid()).is_ok());
    }

    #[test]
    fn test_required_fields_in_form_order() {
        let fields = LeadFields {
            first_name: " ",
            business_name: "",
            ..valid()
        };
        assert_eq!(validate_lead(&fields).unwrap_err(), "First Name is required");

        let fields = LeadFields {
            business_name: "",
            ..valid()
        };
        assert_eq!(
            validate_lead(&fields).unwrap_err(),
            "Business Name is required"
        );

        let fields = LeadFields {
            phone: "",
            ..valid()
        };
        assert_eq!(
            validate_lead(&fields).unwrap_err(),
            "Phone number is required"
        );
    }

    #[test]
    fn test_malformed_email_blocks_submission() {
        let fields = LeadFields {
            email_address: "grace@cobol",
            ..valid()
        };
        assert_eq!(validate_lead(&fields).unwrap_err(), MSG_INVALID_EMAIL);
    }

    #[test]
    fn test_short_phone_blocks_submission() {
        let fields = LeadFields {
            phone: "555-1234",
            ..valid()
        };
        assert_eq!(validate_lead(&fields).unwrap_err(), MSG_INVALID_PHONE);
    }

    #[test]
    fn test_volume_must_be_selected() {
        let fields = LeadFields {
            credit_processing_volume: "",
            ..valid()
        };
        assert_eq!(validate_lead(&fields).unwrap_err(), MSG_SELECT_VOLUME);
    }

    #[test]
    fn test_unknown_volume_rejected() {
        let fields = LeadFields {
            credit_processing_volume: "Select Volume",
            ..valid()
        };
        assert!(validate_lead(&fields)
            .unwrap_err()
            .contains("Invalid Credit Processing Volume"));
    }

    #[test]
    fn test_summarize_counts_new_leads() {
        let summary = summarize(["new", "contacted", "new"]);
        assert_eq!(
            summary,
            LeadSummary {
                total: 3,
                new_count: 2
            }
        );
        assert_eq!(summarize(std::iter::empty()), LeadSummary::default());
    }
}

//! Email and phone shape checks shared by signup, login, and lead capture.

use std::sync::LazyLock;

use regex::Regex;

/// Anything-at-anything-dot-anything, with no whitespace and a single `@`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// ASCII digits plus the separators people actually type into phone fields.
const PHONE_PATTERN: &str = r"^[0-9\s\-\+\(\)\.]+$";

/// Minimum trimmed phone length accepted on a lead.
pub const MIN_PHONE_LENGTH: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

/// Canonical form used for every email lookup and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns `true` if the trimmed value looks like an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Returns `true` if the trimmed value uses only phone characters and is at
/// least [`MIN_PHONE_LENGTH`] characters long.
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    PHONE_RE.is_match(phone) && phone.chars().count() >= MIN_PHONE_LENGTH
}

//! Agent status constants and display helpers.

/// The only status an approved agent can hold; there is no deactivation path.
pub const AGENT_STATUS_ACTIVE: &str = "active";

/// Display name used when tagging leads with their author.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_with_single_space() {
        assert_eq!(full_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(full_name(" Ada ", " Lovelace "), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_with_missing_part() {
        assert_eq!(full_name("Ada", ""), "Ada");
    }
}

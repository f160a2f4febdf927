//! The admin email allow-list.
//!
//! Only identities whose email appears here may sign in through the identity
//! provider or hold an admin session. Entries are stored normalized, so
//! membership checks are case- and whitespace-insensitive.

use std::collections::BTreeSet;

use crate::contact::normalize_email;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: BTreeSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize_email(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parse a comma-separated list, e.g. the `ADMIN_EMAILS` variable.
    pub fn from_csv(value: &str) -> Self {
        Self::new(value.split(','))
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize_email(email))
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }
}

//! Well-known role name constants.
//!
//! The same strings are stored as `principal_kind` on session rows and as the
//! `role` claim of access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AGENT: &str = "agent";

//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated principal from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role and an allow-listed email.
//! - [`rbac::RequireAgent`] -- Requires the `agent` role.

pub mod auth;
pub mod rbac;

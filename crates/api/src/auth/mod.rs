//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`identity`] -- The identity provider that signs admins in.

pub mod identity;
pub mod jwt;
pub mod password;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response struct when the row carries secrets
//! - A create DTO for inserts

pub mod admin;
pub mod agent;
pub mod lead;
pub mod session;
pub mod verification;

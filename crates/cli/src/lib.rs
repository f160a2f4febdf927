//! `paymxnts` terminal client.
//!
//! Stands in for the mobile screens: it keeps the session cache on disk,
//! resumes it on every invocation, and drives signup, review, and lead
//! capture over the HTTP API.

pub mod client;
pub mod commands;
pub mod session;
pub mod session_cache;

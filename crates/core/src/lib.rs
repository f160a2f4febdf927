//! Domain rules for the PaymXnts lead-capture workflow.
//!
//! Everything in this crate is pure: status constants, form validation,
//! navigation targets, and CSV formatting. Persistence lives in
//! `paymxnts_db`, transport in `paymxnts_api`.

pub mod admin;
pub mod agent;
pub mod contact;
pub mod error;
pub mod lead;
pub mod lead_export;
pub mod login;
pub mod navigation;
pub mod roles;
pub mod types;
pub mod verification;

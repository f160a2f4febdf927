//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod admin_account_repo;
pub mod agent_repo;
pub mod lead_repo;
pub mod session_repo;
pub mod verification_repo;

pub use admin_account_repo::AdminAccountRepo;
pub use agent_repo::AgentRepo;
pub use lead_repo::LeadRepo;
pub use session_repo::SessionRepo;
pub use verification_repo::VerificationRepo;

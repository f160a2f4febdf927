pub mod auth;
pub mod leads;
pub mod signup;
pub mod verification;

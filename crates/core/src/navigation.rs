//! Screens a client should show after a workflow step.
//!
//! The server returns a [`Route`] alongside signup, login, and session
//! responses so every client lands on the same screen for the same outcome.

use serde::{Deserialize, Serialize};

use crate::roles::ROLE_ADMIN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Route {
    /// Signed-out landing screen (login / create account).
    Landing,
    /// Waiting for admin approval of the signup for `email`.
    Pending { email: String },
    /// Pending verification review queue.
    AdminReview,
    /// New lead form.
    LeadCreation,
}

impl Route {
    /// Home screen for a signed-in principal of the given role.
    pub fn home_for_role(role: &str) -> Self {
        if role == ROLE_ADMIN {
            Route::AdminReview
        } else {
            Route::LeadCreation
        }
    }
}

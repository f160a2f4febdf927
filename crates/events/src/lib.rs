//! PaymXnts event bus and lead delivery.
//!
//! - [`EventBus`] is the in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`WorkflowEvent`] is the envelope for signup, review, and lead events.
//! - [`delivery::email`] sends a lead to a mailbox with its CSV attached.
//! - [`LeadNotifier`] is the background task that emails every new lead.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{EventBus, WorkflowEvent};
pub use delivery::email::{EmailConfig, EmailError, LeadMailer};
pub use notifier::LeadNotifier;

//! Background task that emails every newly captured lead.
//!
//! Subscribes to the [`EventBus`](crate::bus::EventBus) and forwards each
//! `lead.created` event to a fixed recipient through [`LeadMailer`].
//! Delivery is best effort: failures are logged and never reach the agent.

use paymxnts_db::models::lead::Lead;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::{WorkflowEvent, EVENT_LEAD_CREATED};
use crate::delivery::email::LeadMailer;

pub struct LeadNotifier {
    mailer: LeadMailer,
    recipient: String,
}

impl LeadNotifier {
    pub fn new(mailer: LeadMailer, recipient: impl Into<String>) -> Self {
        Self {
            mailer,
            recipient: recipient.into(),
        }
    }

    /// Run until `cancel` fires or the bus is dropped.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<WorkflowEvent>,
        cancel: CancellationToken,
    ) {
        tracing::info!(recipient = %self.recipient, "Lead notifier started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Lead notifier stopping");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => {
                        let Some(lead) = lead_from_event(&event) else {
                            continue;
                        };
                        if let Err(e) = self.mailer.deliver(&self.recipient, &lead).await {
                            tracing::error!(error = %e, lead_id = lead.id, "Failed to email lead");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Lead notifier lagged, some leads were not emailed");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, lead notifier shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// Decode the lead carried by a `lead.created` event. Other events, and
/// payloads that do not decode, yield `None`.
pub fn lead_from_event(event: &WorkflowEvent) -> Option<Lead> {
    if event.event_type != EVENT_LEAD_CREATED {
        return None;
    }
    match serde_json::from_value(event.payload.clone()) {
        Ok(lead) => Some(lead),
        Err(e) => {
            tracing::warn!(error = %e, "lead.created payload did not decode");
            None
        }
    }
}

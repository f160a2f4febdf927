//! Live pending-verification feed for the admin review screen.
//!
//! Browsers cannot set an `Authorization` header on a WebSocket upgrade, so
//! the access token travels as the `token` query parameter and is checked
//! before the upgrade is accepted. After that the connection receives the
//! whole pending queue once, then again after every verification event.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use paymxnts_core::types::DbId;
use paymxnts_db::models::verification::VerificationResponse;
use paymxnts_db::VerificationStore;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::error::AppResult;
use crate::middleware::auth::authenticate_token;
use crate::middleware::rbac::authorize_admin;
use crate::state::AppState;

/// Message type tag for a full pending queue snapshot.
pub const FEED_PENDING_VERIFICATIONS: &str = "pending_verifications";

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub token: String,
}

/// Serialize a queue snapshot as `{"type":"pending_verifications","data":[...]}`.
pub fn pending_feed_message(pending: &[VerificationResponse]) -> serde_json::Value {
    serde_json::json!({
        "type": FEED_PENDING_VERIFICATIONS,
        "data": pending,
    })
}

/// GET /api/v1/admin/verifications/ws?token=...
pub async fn pending_feed_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let user = authenticate_token(&state, &query.token).await?;
    authorize_admin(&state, &user)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user.id)))
}

async fn handle_socket(socket: WebSocket, state: AppState, admin_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, admin_id, "Verification feed connected");

    // Subscribe before the first snapshot so no change falls in between.
    let mut events = state.event_bus.subscribe();
    let mut rx = state.ws_manager.add(conn_id.clone(), admin_id).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    push_snapshot(&state, &conn_id).await;

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                None | Some(Ok(Message::Close(_))) => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id = %conn_id, "Pong received");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) if event.affects_pending_queue() => {
                    if !push_snapshot(&state, &conn_id).await {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(conn_id = %conn_id, skipped, "Verification feed lagged, resending queue");
                    if !push_snapshot(&state, &conn_id).await {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Verification feed disconnected");
}

/// Load the queue and queue it for the connection.
///
/// Returns `false` once the connection is gone. A failed load is logged and
/// the feed keeps its last snapshot.
async fn push_snapshot(state: &AppState, conn_id: &str) -> bool {
    let pending = match state.store.list_pending_verifications().await {
        Ok(rows) => rows
            .into_iter()
            .map(VerificationResponse::from)
            .collect::<Vec<_>>(),
        Err(e) => {
            tracing::error!(conn_id = %conn_id, error = %e, "Failed to load pending verifications");
            return true;
        }
    };

    let text = pending_feed_message(&pending).to_string();
    state
        .ws_manager
        .send_to(conn_id, Message::Text(text.into()))
        .await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn snapshot_message_shape() {
        let pending = vec![VerificationResponse {
            id: 7,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+15551234567".into(),
            status: "pending".into(),
            created_at: Utc::now(),
        }];

        let msg = pending_feed_message(&pending);
        assert_eq!(msg["type"], "pending_verifications");
        assert_eq!(msg["data"][0]["id"], 7);
        assert_eq!(msg["data"][0]["email"], "ada@example.com");
        assert!(msg["data"][0].get("password_hash").is_none());
    }

    #[test]
    fn empty_queue_serializes_as_empty_array() {
        let msg = pending_feed_message(&[]);
        assert_eq!(msg["data"], serde_json::json!([]));
    }
}

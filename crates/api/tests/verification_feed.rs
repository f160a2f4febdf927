//! End-to-end tests for the live pending-verification WebSocket feed.
//!
//! These bind a real listener so the upgrade goes through hyper.

mod common;

use std::time::Duration;

use common::{admin_token, approved_agent_token, post_json_auth, signup, TestApp};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

async fn serve(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("ws://{addr}/api/v1/admin/verifications/ws")
}

/// Read frames until the next snapshot arrives.
async fn next_snapshot<S>(stream: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for snapshot")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            let json: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(json["type"], "pending_verifications");
            return json;
        }
    }
}

#[tokio::test]
async fn feed_sends_queue_on_connect_and_after_each_change() {
    let app = common::build_test_app().await;
    let first = signup(&app, "Ada", "Lovelace", "ada@example.com").await;
    let token = admin_token(&app).await;
    let url = serve(&app).await;

    let (mut socket, _) = connect_async(format!("{url}?token={token}")).await.unwrap();

    let snapshot = next_snapshot(&mut socket).await;
    assert_eq!(snapshot["data"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["data"][0]["email"], "ada@example.com");

    signup(&app, "Grace", "Hopper", "grace@example.com").await;
    let snapshot = next_snapshot(&mut socket).await;
    assert_eq!(snapshot["data"].as_array().unwrap().len(), 2);

    let uri = format!(
        "/api/v1/admin/verifications/{}/reject",
        first["id"].as_i64().unwrap()
    );
    post_json_auth(&app, &uri, json!({}), &token).await;
    let snapshot = next_snapshot(&mut socket).await;
    let data = snapshot["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["email"], "grace@example.com");
}

#[tokio::test]
async fn feed_refuses_missing_or_non_admin_tokens() {
    let app = common::build_test_app().await;
    let agent = approved_agent_token(&app, "Ada", "Lovelace", "ada@example.com").await;
    let url = serve(&app).await;

    assert!(connect_async(format!("{url}?token=garbage")).await.is_err());
    assert!(connect_async(format!("{url}?token={agent}")).await.is_err());
    assert!(connect_async(url).await.is_err());
}

#[tokio::test]
async fn logout_closes_the_admins_feed() {
    let app = common::build_test_app().await;
    let token = admin_token(&app).await;
    let url = serve(&app).await;

    let (mut socket, _) = connect_async(format!("{url}?token={token}")).await.unwrap();
    next_snapshot(&mut socket).await;

    post_json_auth(&app, "/api/v1/auth/logout", json!({}), &token).await;

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => return true,
                Ok(_) => {}
            }
        }
        true
    })
    .await
    .expect("feed was not closed");
    assert!(closed);
}

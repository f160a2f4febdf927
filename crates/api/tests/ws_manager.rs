//! Unit tests for `WsManager`.
//!
//! These exercise the connection manager directly, without performing any
//! HTTP upgrades.

use axum::extract::ws::Message;
use paymxnts_api::ws::WsManager;

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn send_to_reaches_only_the_named_connection() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string(), 1).await;
    let mut rx2 = manager.add("conn-2".to_string(), 1).await;

    assert!(manager.send_to("conn-1", Message::Text("hello".into())).await);
    assert!(!manager.send_to("missing", Message::Text("lost".into())).await);

    assert_eq!(rx1.recv().await.unwrap(), Message::Text("hello".into()));
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn send_to_reports_closed_channel() {
    let manager = WsManager::new();
    let rx = manager.add("conn-1".to_string(), 1).await;
    drop(rx);

    assert!(!manager.send_to("conn-1", Message::Text("x".into())).await);
}

#[tokio::test]
async fn close_for_admin_only_touches_that_admins_feeds() {
    let manager = WsManager::new();
    let mut mine = manager.add("conn-1".to_string(), 1).await;
    let mut also_mine = manager.add("conn-2".to_string(), 1).await;
    let mut theirs = manager.add("conn-3".to_string(), 2).await;

    assert_eq!(manager.get_by_admin(1).await.len(), 2);
    assert_eq!(manager.close_for_admin(1).await, 2);

    assert_eq!(mine.recv().await.unwrap(), Message::Close(None));
    assert_eq!(also_mine.recv().await.unwrap(), Message::Close(None));
    assert!(theirs.try_recv().is_err());
    assert_eq!(manager.get_by_admin(2).await, vec!["conn-3".to_string()]);
    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string(), 1).await;
    let mut rx2 = manager.add("conn-2".to_string(), 2).await;

    manager.ping_all().await;

    assert!(matches!(rx1.recv().await.unwrap(), Message::Ping(_)));
    assert!(matches!(rx2.recv().await.unwrap(), Message::Ping(_)));
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn-1".to_string(), 1).await;

    manager.shutdown_all().await;

    assert_eq!(rx.recv().await.unwrap(), Message::Close(None));
    assert_eq!(manager.connection_count().await, 0);
}

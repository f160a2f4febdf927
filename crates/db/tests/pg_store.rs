//! Postgres-backed store tests. Run with `DATABASE_URL` set and `--ignored`.

use assert_matches::assert_matches;
use paymxnts_db::models::verification::CreateVerification;
use paymxnts_db::{AdminAccountStore, AgentStore, PgStore, StoreError, VerificationStore};
use sqlx::PgPool;

fn signup(email: &str) -> CreateVerification {
    CreateVerification {
        first_name: "Ada".into(),
        last_name: "Agent".into(),
        email: email.into(),
        phone: "+15551234567".into(),
        password_hash: "$argon2id$stub".into(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    paymxnts_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_approve_is_single_use(pool: PgPool) {
    let store = PgStore::new(pool);
    let admin = store.upsert_admin("boss@paymxnts.com", "hash").await.unwrap();
    let request = store.create_verification(&signup("ada@paymxnts.com")).await.unwrap();

    let agent = store.approve_verification(request.id, admin.id).await.unwrap();
    assert_eq!(agent.approved_by, admin.id);
    assert!(store.list_pending_verifications().await.unwrap().is_empty());
    assert!(store.find_agent(agent.id).await.unwrap().is_some());

    assert_matches!(
        store.approve_verification(request.id, admin.id).await,
        Err(StoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_rolls_back(pool: PgPool) {
    let store = PgStore::new(pool);
    let admin = store.upsert_admin("boss@paymxnts.com", "hash").await.unwrap();
    let first = store.create_verification(&signup("dup@paymxnts.com")).await.unwrap();
    let second = store.create_verification(&signup("dup@paymxnts.com")).await.unwrap();
    store.approve_verification(first.id, admin.id).await.unwrap();

    assert_matches!(
        store.approve_verification(second.id, admin.id).await,
        Err(StoreError::Conflict(ref c)) if c == "uq_agents_email"
    );
    assert_eq!(store.list_pending_verifications().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reject_deletes_pending_row(pool: PgPool) {
    let store = PgStore::new(pool);
    let request = store.create_verification(&signup("no@paymxnts.com")).await.unwrap();

    store.reject_verification(request.id).await.unwrap();
    assert_matches!(
        store.reject_verification(request.id).await,
        Err(StoreError::NotFound { .. })
    );
}

//! Repository for the `admin_accounts` table.

use sqlx::PgPool;
use paymxnts_core::types::{DbId, Timestamp};

use crate::models::admin::AdminAccount;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, failed_login_count, locked_until, \
                        last_login_at, created_at";

pub struct AdminAccountRepo;

impl AdminAccountRepo {
    /// Find an admin by normalized email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AdminAccount>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_accounts WHERE email = $1");
        sqlx::query_as::<_, AdminAccount>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Create the account, or replace its password hash if it already exists.
    pub async fn upsert(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_accounts (email, password_hash)
             VALUES ($1, $2)
             ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminAccount>(&query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    /// Increment the failed login counter by 1, returning the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE admin_accounts SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Lock an admin account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admin_accounts SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the failure counter and drop an expired lock.
    pub async fn clear_lock(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_accounts SET failed_login_count = 0, locked_until = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_accounts SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

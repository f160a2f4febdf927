//! Storage-layer error type shared by the Postgres and in-memory stores.

use paymxnts_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A uniqueness rule was violated. Carries the constraint name.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Map a Postgres unique violation to [`StoreError::Conflict`], leaving
    /// every other error as [`StoreError::Database`].
    pub fn from_unique_violation(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Conflict(constraint);
            }
        }
        StoreError::Database(err)
    }
}

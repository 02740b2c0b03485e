use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::Programmer;

/// Errors surfaced by a programmer store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Conflict on {field}: {message}")]
    Conflict { field: &'static str, message: String },

    #[error("Programmer {0} no longer exists")]
    Missing(Uuid),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // unique_violation
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Conflict {
                    field: "nickname",
                    message: db_err.message().to_string(),
                };
            }
        }

        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::QueryError(err.to_string()),
        }
    }
}

/// Persistence collaborator for programmers.
///
/// Implementations must return `find_all` results in a stable iteration
/// order and must not rewrite `nickname` or `owner_id` when updating.
#[async_trait]
pub trait ProgrammerStore: Send + Sync {
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Programmer>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Programmer>, StoreError>;

    /// Insert when `id` is absent (assigning one), update otherwise
    async fn save(&self, programmer: Programmer) -> Result<Programmer, StoreError>;

    async fn delete(&self, programmer: &Programmer) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

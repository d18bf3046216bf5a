pub mod postgres_store;
pub mod sqlite_store;

pub use postgres_store::PgJobStore;
pub use sqlite_store::SqliteJobStore;

use crate::models::{
    AppliedJob, AppliedJobExport, LoginStats, RecommendedJob, SeedUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Corrupt row in {table}: {detail}")]
    CorruptRow { table: &'static str, detail: String },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for users, the shared recommendation catalog and per-user
/// applied jobs.
///
/// Inserts are conflict tolerant: an existing key makes the insert a no-op
/// reported as `Ok(false)`. The uniqueness constraints of the backing store
/// decide concurrent inserts of the same key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Matches username and password exactly. On a match the login counter
    /// and last login time are updated and the refreshed user is returned.
    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> RepositoryResult<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    /// All users, most logins first.
    async fn login_analytics(&self) -> RepositoryResult<Vec<LoginStats>>;
    /// Creates the account unless the username is taken.
    async fn seed_user(&self, seed: &SeedUser) -> RepositoryResult<bool>;

    /// The whole catalog, newest first.
    async fn recommended_jobs(&self) -> RepositoryResult<Vec<RecommendedJob>>;
    async fn add_recommended_job(
        &self,
        job_id: &str,
        job_data: &Value,
        recommended_at: DateTime<Utc>,
    ) -> RepositoryResult<bool>;

    async fn applied_job_ids(&self, user_id: i64) -> RepositoryResult<Vec<String>>;
    /// The user's applied jobs, newest first.
    async fn applied_jobs(&self, user_id: i64) -> RepositoryResult<Vec<AppliedJob>>;
    async fn mark_job_applied(
        &self,
        job_id: &str,
        job_data: &Value,
        user_id: i64,
        applied_at: DateTime<Utc>,
    ) -> RepositoryResult<bool>;
    async fn export_applied_jobs(&self) -> RepositoryResult<Vec<AppliedJobExport>>;
}

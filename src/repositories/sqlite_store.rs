use super::{JobStore, RepositoryError, RepositoryResult};
use crate::models::{
    AppliedJob, AppliedJobExport, LoginStats, RecommendedJob, SeedUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, types::Json, Row, SqlitePool};

/// `JobStore` over a SQLite file. Timestamps are stored as epoch
/// milliseconds and job payloads as JSON text.
pub struct SqliteJobStore {
    pool: SqlitePool,
}

impl SqliteJobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn from_millis(table: &'static str, millis: i64) -> RepositoryResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| RepositoryError::CorruptRow {
        table,
        detail: format!("timestamp {} out of range", millis),
    })
}

fn user_from_row(row: &SqliteRow) -> RepositoryResult<User> {
    let created_at: Option<i64> = row.try_get("created_at")?;
    let last_login_at: Option<i64> = row.try_get("last_login_at")?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        is_guest: row.try_get("is_guest")?,
        login_count: row.try_get("login_count")?,
        created_at: created_at.map(|ms| from_millis("users", ms)).transpose()?,
        last_login_at: last_login_at
            .map(|ms| from_millis("users", ms))
            .transpose()?,
    })
}

fn applied_from_row(row: &SqliteRow) -> RepositoryResult<AppliedJob> {
    let Json(job_data) = row.try_get::<Json<Value>, _>("job_data")?;
    Ok(AppliedJob {
        job_id: row.try_get("job_id")?,
        job_data,
        applied_at: from_millis("applied_jobs", row.try_get("applied_at")?)?,
    })
}

const USER_COLUMNS: &str =
    "id, username, display_name, is_guest, login_count, created_at, last_login_at";

#[async_trait]
impl JobStore for SqliteJobStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> RepositoryResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET login_count = login_count + 1, last_login_at = ?
            WHERE username = ? AND password = ?
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(Utc::now().timestamp_millis())
            .bind(username)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn login_analytics(&self) -> RepositoryResult<Vec<LoginStats>> {
        let rows = sqlx::query(
            r#"
            SELECT username, display_name, is_guest, login_count, last_login_at
            FROM users
            ORDER BY login_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                let last_login_at: Option<i64> = r.try_get("last_login_at")?;
                Ok(LoginStats {
                    username: r.try_get("username")?,
                    display_name: r.try_get("display_name")?,
                    is_guest: r.try_get("is_guest")?,
                    login_count: r.try_get("login_count")?,
                    last_login_at: last_login_at
                        .map(|ms| from_millis("users", ms))
                        .transpose()?,
                })
            })
            .collect()
    }

    async fn seed_user(&self, seed: &SeedUser) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, display_name, is_guest, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(seed.username)
        .bind(seed.password)
        .bind(seed.display_name)
        .bind(seed.is_guest)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn recommended_jobs(&self) -> RepositoryResult<Vec<RecommendedJob>> {
        let rows = sqlx::query(
            r#"
            SELECT job_id, job_data, recommended_at
            FROM recommended_jobs
            ORDER BY recommended_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                let Json(job_data) = r.try_get::<Json<Value>, _>("job_data")?;
                Ok(RecommendedJob {
                    job_id: r.try_get("job_id")?,
                    job_data,
                    recommended_at: from_millis("recommended_jobs", r.try_get("recommended_at")?)?,
                })
            })
            .collect()
    }

    async fn add_recommended_job(
        &self,
        job_id: &str,
        job_data: &Value,
        recommended_at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO recommended_jobs (job_id, job_data, recommended_at)
            VALUES (?, ?, ?)
            ON CONFLICT (job_id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(Json(job_data))
        .bind(recommended_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn applied_job_ids(&self, user_id: i64) -> RepositoryResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT job_id FROM applied_jobs WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn applied_jobs(&self, user_id: i64) -> RepositoryResult<Vec<AppliedJob>> {
        let rows = sqlx::query(
            r#"
            SELECT job_id, job_data, applied_at
            FROM applied_jobs
            WHERE user_id = ?
            ORDER BY applied_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(applied_from_row).collect()
    }

    async fn mark_job_applied(
        &self,
        job_id: &str,
        job_data: &Value,
        user_id: i64,
        applied_at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO applied_jobs (job_id, job_data, user_id, applied_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (job_id, user_id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(Json(job_data))
        .bind(user_id)
        .bind(applied_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn export_applied_jobs(&self) -> RepositoryResult<Vec<AppliedJobExport>> {
        let rows = sqlx::query(
            r#"
            SELECT u.username, a.job_id, a.job_data, a.applied_at
            FROM applied_jobs a
            JOIN users u ON u.id = a.user_id
            ORDER BY a.applied_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                Ok(AppliedJobExport {
                    username: r.try_get("username")?,
                    job: applied_from_row(r)?,
                })
            })
            .collect()
    }
}

use super::{JobStore, RepositoryResult};
use crate::models::{
    AppliedJob, AppliedJobExport, LoginStats, RecommendedJob, SeedUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};

/// `JobStore` over PostgreSQL, with JSONB payloads and TIMESTAMPTZ columns.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row(row: &PgRow) -> RepositoryResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        is_guest: row.try_get("is_guest")?,
        login_count: row.try_get("login_count")?,
        created_at: row.try_get("created_at")?,
        last_login_at: row.try_get("last_login_at")?,
    })
}

fn applied_from_row(row: &PgRow) -> RepositoryResult<AppliedJob> {
    let Json(job_data) = row.try_get::<Json<Value>, _>("job_data")?;
    Ok(AppliedJob {
        job_id: row.try_get("job_id")?,
        job_data,
        applied_at: row.try_get("applied_at")?,
    })
}

#[async_trait]
impl JobStore for PgJobStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET login_count = login_count + 1, last_login_at = $3
            WHERE username = $1 AND password = $2
            RETURNING id, username, display_name, is_guest, login_count, created_at, last_login_at
            "#,
        )
        .bind(username)
        .bind(password)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, display_name, is_guest, login_count, created_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, display_name, is_guest, login_count, created_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
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
                Ok(LoginStats {
                    username: r.try_get("username")?,
                    display_name: r.try_get("display_name")?,
                    is_guest: r.try_get("is_guest")?,
                    login_count: r.try_get("login_count")?,
                    last_login_at: r.try_get("last_login_at")?,
                })
            })
            .collect()
    }

    async fn seed_user(&self, seed: &SeedUser) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, display_name, is_guest)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(seed.username)
        .bind(seed.password)
        .bind(seed.display_name)
        .bind(seed.is_guest)
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
                    recommended_at: r.try_get("recommended_at")?,
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
            VALUES ($1, $2, $3)
            ON CONFLICT (job_id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(Json(job_data))
        .bind(recommended_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn applied_job_ids(&self, user_id: i64) -> RepositoryResult<Vec<String>> {
        let ids =
            sqlx::query_scalar::<_, String>("SELECT job_id FROM applied_jobs WHERE user_id = $1")
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
            WHERE user_id = $1
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
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (job_id, user_id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(Json(job_data))
        .bind(user_id)
        .bind(applied_at)
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

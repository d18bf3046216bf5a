pub mod test_helpers {
    use crate::db;
    use crate::repositories::{JobStore, RepositoryResult, SqliteJobStore};
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        // A single connection that never expires, since every connection
        // to :memory: opens a fresh database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        sqlx::migrate!("./migrations/sqlite").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    pub async fn create_test_db_file() -> RepositoryResult<(SqlitePool, NamedTempFile)> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = db::connect_sqlite(&database_url, 1).await?;

        Ok((pool, temp_file))
    }

    /// In-memory store with the default owner and guest accounts.
    pub async fn create_seeded_store() -> RepositoryResult<SqliteJobStore> {
        let store = SqliteJobStore::new(create_test_db().await?);
        db::seed_default_users(&store).await?;
        Ok(store)
    }

    /// Id of a seeded account
    pub async fn user_id(store: &dyn JobStore, username: &str) -> i64 {
        match store.find_user_by_username(username).await {
            Ok(Some(user)) => user.id,
            other => panic!("seeded user '{}' missing: {:?}", username, other),
        }
    }

    /// Timestamp `seconds` after a fixed epoch, for ordering tests
    pub fn at(seconds: i64) -> DateTime<Utc> {
        match DateTime::from_timestamp(1_700_000_000 + seconds, 0) {
            Some(ts) => ts,
            None => panic!("timestamp out of range"),
        }
    }

    /// Insert a catalog job with a `source` and title derived from its id
    pub async fn insert_catalog_job(
        store: &dyn JobStore,
        job_id: &str,
        source: &str,
        recommended_at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let data = json!({
            "title": format!("Job {}", job_id),
            "company": "Lowcountry Logistics",
            "source": source,
        });
        store.add_recommended_job(job_id, &data, recommended_at).await
    }
}

// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_store() -> crate::repositories::SqliteJobStore {
    match test_helpers::create_seeded_store().await {
        Ok(store) => store,
        Err(e) => panic!("Failed to create test store: {}", e),
    }
}

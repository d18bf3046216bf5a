use std::{collections::HashMap, env};

use jobs_dashboard::{
    config::{BackendKind, ConfigError, Settings},
    db,
};
use serial_test::serial;

const KEYS: [&str; 8] = [
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "DATABASE_BACKEND",
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "ALLOWED_ORIGINS",
    "STATIC_DIR",
];

#[derive(Default)]
struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    /// Starts from an environment with none of the dashboard's variables set.
    fn clean() -> Self {
        let mut guard = Self::default();
        for key in KEYS {
            guard.remove(key);
        }
        guard
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::set_var(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
    let mut env_guard = EnvGuard::clean();
    env_guard.set("HOST", "0.0.0.0");
    env_guard.set("PORT", "8080");
    env_guard.set("ENVIRONMENT", "production");
    env_guard.set("STATIC_DIR", "client/build");

    let settings = Settings::from_env().unwrap();

    assert_eq!(settings.bind_address(), "0.0.0.0:8080");
    assert_eq!(settings.environment, "production");
    assert_eq!(settings.database.backend, BackendKind::Sqlite);
    assert_eq!(
        settings.static_dir.as_deref(),
        Some(std::path::Path::new("client/build"))
    );
}

#[test]
#[serial]
fn blank_values_count_as_unset() {
    let mut env_guard = EnvGuard::clean();
    env_guard.set("PORT", "   ");
    env_guard.set("DATABASE_URL", "");

    let settings = Settings::from_env().unwrap();

    assert_eq!(settings.port, 3001);
    assert!(!settings.database.url_configured);
}

#[test]
#[serial]
fn postgres_backend_without_url_fails() {
    let mut env_guard = EnvGuard::clean();
    env_guard.set("DATABASE_BACKEND", "postgres");

    assert_eq!(
        Settings::from_env(),
        Err(ConfigError::Missing("DATABASE_URL"))
    );
}

#[tokio::test]
#[serial]
async fn configured_sqlite_file_is_created_and_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("jobs.db");

    let mut env_guard = EnvGuard::clean();
    env_guard.set("DATABASE_URL", format!("sqlite://{}", db_path.display()));

    let settings = Settings::from_env().unwrap();
    let store = db::open_store(&settings.database).await.unwrap();

    assert_eq!(db::seed_default_users(store.as_ref()).await.unwrap(), 2);
    assert!(db_path.exists());
    assert_eq!(store.backend_name(), "sqlite");
}

use std::{env, fmt, path::PathBuf, str::FromStr};

use tracing::info;

const DEFAULT_SQLITE_URL: &str = "sqlite://jobs.db?mode=rwc";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,https://jobs-dashboard-frontend.onrender.com";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Unknown DATABASE_BACKEND '{0}' (expected 'sqlite' or 'postgres')")]
    UnknownBackend(String),
    #[error("DATABASE_URL does not look like a {0} connection string")]
    BackendMismatch(BackendKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Postgres,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Postgres => "postgres",
        }
    }

    /// The backend whose URL scheme `url` uses.
    pub fn from_url(url: &str) -> Option<Self> {
        [BackendKind::Sqlite, BackendKind::Postgres]
            .into_iter()
            .find(|kind| kind.accepts_url(url))
    }

    fn accepts_url(self, url: &str) -> bool {
        match self {
            BackendKind::Sqlite => url.starts_with("sqlite:"),
            BackendKind::Postgres => {
                url.starts_with("postgres://") || url.starts_with("postgresql://")
            }
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub backend: BackendKind,
    pub url: String,
    pub max_connections: u32,
    /// Whether `DATABASE_URL` was given explicitly rather than defaulted.
    pub url_configured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database: DatabaseConfig,
    pub allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match var("DATABASE_BACKEND") {
            Some(value) => value.parse()?,
            None => {
                info!("DATABASE_BACKEND not set, using default: sqlite");
                BackendKind::Sqlite
            }
        };

        let (url, url_configured) = match (var("DATABASE_URL"), backend) {
            (Some(url), _) => (url, true),
            (None, BackendKind::Sqlite) => {
                info!("DATABASE_URL not set, using default: {}", DEFAULT_SQLITE_URL);
                (DEFAULT_SQLITE_URL.to_string(), false)
            }
            (None, BackendKind::Postgres) => return Err(ConfigError::Missing("DATABASE_URL")),
        };
        if !backend.accepts_url(&url) {
            return Err(ConfigError::BackendMismatch(backend));
        }

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Settings {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or_default(&var, "PORT", 3001)?,
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            database: DatabaseConfig {
                backend,
                url,
                max_connections: parse_or_default(&var, "DATABASE_MAX_CONNECTIONS", 5)?,
                url_configured,
            },
            allowed_origins,
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_sqlite() {
        let settings = settings_from(&[]).unwrap();

        assert_eq!(settings.database.backend, BackendKind::Sqlite);
        assert_eq!(settings.database.url, DEFAULT_SQLITE_URL);
        assert!(!settings.database.url_configured);
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.bind_address(), "127.0.0.1:3001");
        assert_eq!(settings.allowed_origins.len(), 2);
        assert_eq!(settings.static_dir, None);
    }

    #[test]
    fn postgres_requires_url() {
        let result = settings_from(&[("DATABASE_BACKEND", "postgres")]);
        assert_eq!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn url_presence_does_not_switch_backend() {
        let result = settings_from(&[("DATABASE_URL", "postgres://localhost/jobs")]);
        assert_eq!(
            result,
            Err(ConfigError::BackendMismatch(BackendKind::Sqlite))
        );
    }

    #[test]
    fn explicit_postgres_backend() {
        let settings = settings_from(&[
            ("DATABASE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgresql://app@db.internal/jobs"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();

        assert_eq!(settings.database.backend, BackendKind::Postgres);
        assert_eq!(settings.database.max_connections, 12);
        assert_eq!(
            BackendKind::from_url(&settings.database.url),
            Some(BackendKind::Postgres)
        );
        assert_eq!(BackendKind::from_url("mysql://nope"), None);
        assert!(settings.database.url_configured);
    }

    #[test]
    fn rejects_unknown_backend_and_bad_port() {
        assert_eq!(
            settings_from(&[("DATABASE_BACKEND", "mongo")]),
            Err(ConfigError::UnknownBackend("mongo".to_string()))
        );
        assert!(matches!(
            settings_from(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
    }

    #[test]
    fn parses_origin_list() {
        let settings = settings_from(&[(
            "ALLOWED_ORIGINS",
            " https://a.example , ,https://b.example",
        )])
        .unwrap();
        assert_eq!(
            settings.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}

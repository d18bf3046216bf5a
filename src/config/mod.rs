pub mod settings;

pub use settings::{BackendKind, ConfigError, DatabaseConfig, Settings};

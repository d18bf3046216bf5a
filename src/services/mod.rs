pub mod auth_service;
pub mod catalog_import;
pub mod job_service;
pub mod store_migration;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use catalog_import::entries_from_sections;
pub use job_service::{BatchOutcome, EntryOutcome, JobService, JobServiceError};
pub use store_migration::{copy_store, MigrationReport, TableReport};

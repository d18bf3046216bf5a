pub mod admin_handlers;
pub mod analytics_handlers;
pub mod health_handlers;
pub mod job_handlers;

pub use admin_handlers::recommend_handler;
pub use analytics_handlers::analytics_handler;
pub use health_handlers::{debug_handler, health_handler};
pub use job_handlers::{
    applied_jobs_handler, apply_handler, list_jobs_handler, list_recommended_handler,
};

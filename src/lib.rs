pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod router;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<services::AuthService>,
    pub job_service: Arc<services::JobService>,
    pub settings: Arc<config::Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn repositories::JobStore>, settings: config::Settings) -> Self {
        Self {
            auth_service: Arc::new(services::AuthService::new(store.clone())),
            job_service: Arc::new(services::JobService::new(store)),
            settings: Arc::new(settings),
        }
    }
}

use crate::models::{LoginStats, User};
use crate::repositories::{JobStore, RepositoryError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Access denied")]
    Forbidden,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub struct AuthService {
    store: Arc<dyn JobStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Checks the credentials and records the login. A wrong password and an
    /// unknown username produce the same error.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .store
            .authenticate_user(&request.username, &request.password)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        tracing::info!(user_id = user.id, login_count = user.login_count, "login");
        Ok(user)
    }

    /// Login statistics for every account. Only non-guest users may read them.
    pub async fn login_analytics(
        &self,
        requester_id: i64,
    ) -> Result<Vec<LoginStats>, AuthServiceError> {
        match self.store.find_user_by_id(requester_id).await? {
            Some(user) if !user.is_guest => Ok(self.store.login_analytics().await?),
            _ => Err(AuthServiceError::Forbidden),
        }
    }
}

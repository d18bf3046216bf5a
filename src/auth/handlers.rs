use crate::error::{AppError, Context, Result};
use crate::models::SessionUser;
use crate::services::LoginRequest;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    username: Option<Value>,
    #[serde(default)]
    password: Option<Value>,
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    success: bool,
    user: SessionUser,
}

/// POST /api/auth/login
pub async fn login_handler(
    State(app_state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>> {
    let (Some(username), Some(password)) = (
        non_empty_string(body.username),
        non_empty_string(body.password),
    ) else {
        return Err(AppError::Validation("Username and password are required"));
    };

    let user = app_state
        .auth_service
        .authenticate(LoginRequest { username, password })
        .await
        .context("Login failed")?;

    Ok(Json(LoginResponse {
        success: true,
        user: user.into(),
    }))
}

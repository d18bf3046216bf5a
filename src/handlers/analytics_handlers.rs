use crate::auth::CurrentUser;
use crate::error::{Context, Result};
use crate::models::LoginStats;
use crate::AppState;
use axum::{extract::State, Extension, Json};

/// GET /api/analytics, owner accounts only.
pub async fn analytics_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<LoginStats>>> {
    let stats = app_state
        .auth_service
        .login_analytics(user_id)
        .await
        .context("Failed to load analytics")?;
    Ok(Json(stats))
}

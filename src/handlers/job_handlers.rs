use crate::auth::CurrentUser;
use crate::error::{AppError, Context, Result};
use crate::models::{AppliedJob, JobSections, RecommendEntry};
use crate::AppState;
use axum::{extract::State, Extension, Json};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    success: bool,
    message: &'static str,
    was_new: bool,
}

/// GET /api/jobs
pub async fn list_jobs_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<JobSections>> {
    let sections = app_state
        .job_service
        .list_jobs(user_id)
        .await
        .context("Failed to load jobs data")?;
    Ok(Json(sections))
}

/// GET /api/recommended
pub async fn list_recommended_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<JobSections>> {
    let sections = app_state
        .job_service
        .list_recommended(user_id)
        .await
        .context("Failed to load recommended jobs")?;
    Ok(Json(sections))
}

/// POST /api/apply
pub async fn apply_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(entry): Json<RecommendEntry>,
) -> Result<Json<ApplyResponse>> {
    let Some((job_id, job_data)) = entry.into_parts() else {
        return Err(AppError::Validation("jobId and jobData are required"));
    };

    let was_new = app_state
        .job_service
        .apply(user_id, &job_id, &job_data)
        .await
        .context("Failed to mark job as applied")?;

    Ok(Json(ApplyResponse {
        success: true,
        message: if was_new {
            "Job marked as applied"
        } else {
            "Job was already applied"
        },
        was_new,
    }))
}

/// GET /api/applied
pub async fn applied_jobs_handler(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<AppliedJob>>> {
    let jobs = app_state
        .job_service
        .applied_jobs(user_id)
        .await
        .context("Failed to load applied jobs")?;
    Ok(Json(jobs))
}

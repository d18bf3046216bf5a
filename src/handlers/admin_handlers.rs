use crate::error::{AppError, Context, Result};
use crate::models::RecommendEntry;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Either a single job (`jobId` + `jobData`) or a bulk `jobs` array.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendBody {
    #[serde(default)]
    job_id: Option<Value>,
    #[serde(default)]
    job_data: Option<Value>,
    #[serde(default)]
    jobs: Option<Value>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    was_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<usize>,
}

/// POST /api/admin/recommend
///
/// Not behind the identity middleware.
pub async fn recommend_handler(
    State(app_state): State<AppState>,
    Json(body): Json<RecommendBody>,
) -> Result<Json<RecommendResponse>> {
    if let Some(Value::Array(jobs)) = body.jobs {
        let entries: Vec<RecommendEntry> = jobs
            .into_iter()
            .map(|job| serde_json::from_value(job).unwrap_or_default())
            .collect();

        let outcome = app_state
            .job_service
            .recommend_batch(entries)
            .await
            .context("Failed to add job to recommended")?;

        return Ok(Json(RecommendResponse {
            success: true,
            message: format!(
                "Processed {} jobs: {} added, {} skipped",
                outcome.processed, outcome.added, outcome.skipped
            ),
            added: Some(outcome.added),
            skipped: Some(outcome.skipped),
            ..Default::default()
        }));
    }

    let entry = RecommendEntry {
        job_id: body.job_id,
        job_data: body.job_data,
    };
    let Some((job_id, job_data)) = entry.into_parts() else {
        return Err(AppError::Validation("jobId and jobData are required"));
    };

    let was_new = app_state
        .job_service
        .recommend(&job_id, &job_data)
        .await
        .context("Failed to add job to recommended")?;

    Ok(Json(RecommendResponse {
        success: true,
        message: if was_new {
            "Job added to recommended".to_string()
        } else {
            "Job already exists".to_string()
        },
        was_new: Some(was_new),
        ..Default::default()
    }))
}

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::auth::CurrentUser;
use crate::models::{AnalyzeQuery, WorkoutAnalysis};
use crate::services::{build_analysis, parse_fit, StorageError};

/// Fetch a previously uploaded FIT file and return its placeholder analysis
#[tracing::instrument(skip_all, fields(user = %user.username, file_id = %query.file_id))]
pub async fn analyze_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<AnalyzeQuery>, ApiError>,
) -> Result<Json<WorkoutAnalysis>, ApiError> {
    let file_id = Uuid::parse_str(query.file_id.trim())
        .map_err(|_| ApiError::BadRequest("Invalid file id".to_string()))?;

    let data = state
        .storage
        .download_workout(user.id, file_id)
        .await
        .map_err(|err| match err {
            StorageError::NotFound(_) => ApiError::NotFound("Workout file not found".to_string()),
            other => ApiError::storage("Failed to retrieve file from S3", other),
        })?;

    let series = tokio::task::spawn_blocking(move || parse_fit(&data))
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("FIT decoding task failed")))?
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;

    let analysis = build_analysis(&user.username, file_id, series)
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;

    Ok(Json(analysis))
}

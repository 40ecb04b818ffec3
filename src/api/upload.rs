use axum::{
    extract::{Multipart, State},
    Json,
};
use axum_extra::extract::WithRejection;
use bytes::Bytes;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::auth::CurrentUser;
use crate::models::UploadResponse;
use crate::services::looks_like_fit;

const FILE_FIELD: &str = "file";

/// Accept a multipart FIT upload and store it for the caller
#[tracing::instrument(skip_all, fields(user = %user.username))]
pub async fn upload_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(mut multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<Json<UploadResponse>, ApiError> {
    let max_bytes = state.max_upload_bytes;
    let mut file_data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, max_bytes))?;
        file_data = Some(data);
    }

    let data = file_data
        .ok_or_else(|| ApiError::BadRequest("A 'file' field is required".to_string()))?;

    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(max_bytes));
    }
    if !looks_like_fit(&data) {
        return Err(ApiError::BadRequest("Uploaded file is not a FIT file".to_string()));
    }

    let size = data.len();
    let file_id = state
        .storage
        .upload_workout(user.id, data)
        .await
        .map_err(|e| ApiError::storage("Failed to upload file to S3", e))?;

    info!("Stored workout {} ({} bytes)", file_id, size);

    Ok(Json(UploadResponse {
        file_id: file_id.to_string(),
    }))
}

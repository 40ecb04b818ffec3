use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::auth::CurrentUser;
use crate::models::{MessageResponse, ZoneConfig, ZonesResponse};
use crate::repositories::UserRepository;

#[tracing::instrument(skip_all, fields(user = %user.username))]
pub async fn configure_zones(
    State(users): State<Arc<dyn UserRepository>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(config), _): WithRejection<Json<ZoneConfig>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    config
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    users.update_zones(user.id, &config).await?;

    Ok(Json(MessageResponse::new("Zones configured successfully")))
}

pub async fn get_zones(CurrentUser(user): CurrentUser) -> Json<ZonesResponse> {
    Json(ZonesResponse::from_columns(user.power_zones, user.heart_rate_zones))
}

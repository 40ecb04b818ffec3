use axum::{extract::State, Form, Json};
use axum_extra::extract::WithRejection;

use crate::api::error::ApiError;
use crate::auth::{AuthService, CurrentUser, TokenRequest, TokenResponse};
use crate::models::{CreateUser, UserResponse};

/// Register a new user
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn create_user(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUser>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = auth_service.register(request).await?;
    Ok(Json(UserResponse::from(user)))
}

/// OAuth2 password grant token endpoint
#[tracing::instrument(skip_all, fields(username = %form.username))]
pub async fn login_for_access_token(
    State(auth_service): State<AuthService>,
    WithRejection(Form(form), _): WithRejection<Form<TokenRequest>, ApiError>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = auth_service.login(form).await?;
    Ok(Json(response))
}

/// Current user profile
pub async fn read_users_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

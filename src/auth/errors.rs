use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::error::detail_response;
use crate::auth::password::PasswordError;
use crate::repositories::RepositoryError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Inactive user")]
    InactiveUser,
    #[error("Username already registered")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Unsupported grant type")]
    UnsupportedGrantType,
    #[error("Username must not be empty")]
    InvalidUsername,
    #[error("{0}")]
    PasswordValidation(PasswordError),
    #[error("Password hashing error: {0}")]
    PasswordHashing(PasswordError),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        if err.is_policy_violation() {
            AuthError::PasswordValidation(err)
        } else {
            AuthError::PasswordHashing(err)
        }
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InactiveUser
            | AuthError::UsernameTaken
            | AuthError::EmailTaken
            | AuthError::UnsupportedGrantType
            | AuthError::InvalidUsername
            | AuthError::PasswordValidation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::MissingAuthHeader => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::PasswordHashing(_) | AuthError::Jwt(_) | AuthError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Clients only ever see one message for every bearer failure
    fn detail(&self) -> String {
        match self {
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::MissingAuthHeader => {
                "Could not validate credentials".to_string()
            }
            AuthError::PasswordHashing(_) | AuthError::Jwt(_) | AuthError::Repository(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn challenges_bearer(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::MissingAuthHeader
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Authentication failure: {}", self);
        } else {
            tracing::debug!("Authentication rejected: {}", self);
        }

        let mut response = detail_response(status, self.detail());
        if self.challenges_bearer() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

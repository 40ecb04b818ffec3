use std::sync::Arc;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, PasswordError, PasswordPolicy,
    DEFAULT_COST,
};
use crate::auth::{AuthError, JwtService, TokenRequest, TokenResponse};
use crate::models::{CreateUser, NewUser, User};
use crate::repositories::{RepositoryError, UserRepository};

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    users: Arc<dyn UserRepository>,
    password_policy: PasswordPolicy,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: JwtService) -> Self {
        Self {
            jwt_service,
            users,
            password_policy: PasswordPolicy::default(),
            bcrypt_cost: DEFAULT_COST,
        }
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = policy;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Register a new user
    pub async fn register(&self, request: CreateUser) -> Result<User, AuthError> {
        // Stored exactly as given so the same value signs in
        let username = request.username;
        if username.trim().is_empty() {
            return Err(AuthError::InvalidUsername);
        }
        let email = request
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        let full_name = request
            .full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        if self.users.get_user_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if let Some(email) = &email {
            if self.users.get_user_by_email(email).await?.is_some() {
                return Err(AuthError::EmailTaken);
            }
        }

        validate_password_strength(&request.password, &self.password_policy)?;
        let hashed_password = self.hash_blocking(request.password).await?;

        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                full_name,
                hashed_password,
            })
            .await
            .map_err(|err| match err {
                RepositoryError::DuplicateUsername => AuthError::UsernameTaken,
                RepositoryError::DuplicateEmail => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .verify_blocking(password.to_string(), user.hashed_password.clone())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// OAuth2 password grant
    pub async fn login(&self, request: TokenRequest) -> Result<TokenResponse, AuthError> {
        if let Some(grant_type) = &request.grant_type {
            if grant_type != "password" {
                return Err(AuthError::UnsupportedGrantType);
            }
        }

        let user = self.authenticate(&request.username, &request.password).await?;
        let access_token = self.jwt_service.create_access_token(&user.username)?;

        Ok(TokenResponse::bearer(access_token))
    }

    /// Resolve the active user a bearer token belongs to
    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;

        let user = self
            .users
            .get_user_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if user.disabled {
            return Err(AuthError::InactiveUser);
        }

        Ok(user)
    }

    async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|_| AuthError::PasswordHashing(PasswordError::HashingFailed))??;
        Ok(hashed)
    }

    async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|_| AuthError::PasswordHashing(PasswordError::VerificationFailed))??;
        Ok(verified)
    }
}

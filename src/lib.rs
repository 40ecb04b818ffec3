//! Workout upload and analysis service.
//!
//! Users register and obtain bearer tokens, upload FIT activity files to
//! object storage, configure heart-rate and power zones, and request a
//! placeholder analysis of an uploaded file's record stream.

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;

use anyhow::Result;
use std::sync::Arc;

use crate::api::AppState;
use crate::auth::{AuthService, JwtService};
use crate::config::{run_migrations, DatabaseBackend, Settings, StorageBackend};
use crate::repositories::{MemoryRepository, PostgresRepository, UserRepository, WorkoutRepository};
use crate::services::{MemoryWorkoutStorage, S3WorkoutStorage, WorkoutStorage};

/// Wire repositories, storage and token service from configuration
pub async fn build_state(settings: &Settings) -> Result<AppState> {
    let (users, workouts): (Arc<dyn UserRepository>, Arc<dyn WorkoutRepository>) =
        match settings.database.backend {
            DatabaseBackend::Postgres => {
                let pool = settings.database.create_pool().await?;
                run_migrations(&pool).await?;
                tracing::info!("Connected to PostgreSQL and applied migrations");
                let repo = Arc::new(PostgresRepository::new(pool));
                (repo.clone(), repo)
            }
            DatabaseBackend::Memory => {
                warn_if_not_development(settings, "DATABASE_BACKEND=memory");
                let repo = Arc::new(MemoryRepository::new());
                (repo.clone(), repo)
            }
        };

    let storage: Arc<dyn WorkoutStorage> = match settings.storage.backend {
        StorageBackend::S3 => {
            let client = settings.storage.create_s3_client().await;
            tracing::info!("Using S3 bucket {}", settings.storage.bucket);
            Arc::new(S3WorkoutStorage::new(client, settings.storage.bucket.clone()))
        }
        StorageBackend::Memory => {
            warn_if_not_development(settings, "STORAGE_BACKEND=memory");
            Arc::new(MemoryWorkoutStorage::new())
        }
    };

    let jwt_service = JwtService::new(
        settings.app.signing_secret(),
        chrono::Duration::minutes(settings.app.access_token_expire_minutes),
    );

    let auth = AuthService::new(users.clone(), jwt_service)
        .with_password_policy(settings.app.password_policy());

    Ok(AppState::new(
        auth,
        users,
        workouts,
        storage,
        settings.app.max_upload_bytes,
    ))
}

fn warn_if_not_development(settings: &Settings, what: &str) {
    if !settings.app.is_development() {
        tracing::warn!(
            "{} keeps data in process memory; it is lost on restart (ENVIRONMENT={})",
            what,
            settings.app.environment
        );
    }
}

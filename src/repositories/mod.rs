// Persistence for users and manual workouts

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewUser, User, Workout, WorkoutType, ZoneConfig};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Record not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A validated manual workout, ready to insert
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration: i32,
    pub workout_type: WorkoutType,
    pub details: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; username and email are unique
    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Replace both zone arrays on the user row
    async fn update_zones(&self, user_id: Uuid, zones: &ZoneConfig) -> Result<(), RepositoryError>;

    async fn set_disabled(&self, user_id: Uuid, disabled: bool) -> Result<(), RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, RepositoryError>;

    /// Workouts for one user, newest first
    async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, RepositoryError>;
}

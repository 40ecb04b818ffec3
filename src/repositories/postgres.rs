use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewWorkout, RepositoryError, UserRepository, WorkoutRepository};
use crate::models::{NewUser, User, Workout, ZoneConfig};

const USER_COLUMNS: &str = "id, username, email, full_name, hashed_password, disabled, \
                            power_zones, heart_rate_zones, created_at, updated_at";

/// PostgreSQL-backed repository
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    db: PgPool,
}

impl PostgresRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

/// Map unique-index violations onto the matching domain error
fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => return RepositoryError::DuplicateUsername,
                Some("users_email_key") => return RepositoryError::DuplicateEmail,
                _ => {}
            }
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();

        let query = format!(
            "INSERT INTO users (id, username, email, full_name, hashed_password, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.full_name)
            .bind(&new_user.hashed_password)
            .bind(now)
            .fetch_one(&self.db)
            .await
            .map_err(map_unique_violation)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn update_zones(&self, user_id: Uuid, zones: &ZoneConfig) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET power_zones = $2, heart_rate_zones = $3, updated_at = $4
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(&zones.power_zones)
        .bind(&zones.heart_rate_zones)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn set_disabled(&self, user_id: Uuid, disabled: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET disabled = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(disabled)
            .bind(Utc::now())
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl WorkoutRepository for PostgresRepository {
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, RepositoryError> {
        let created = sqlx::query_as::<_, Workout>(
            "INSERT INTO workouts (id, user_id, date, duration, workout_type, details, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, user_id, date, duration, workout_type, details, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(workout.user_id)
        .bind(workout.date)
        .bind(workout.duration)
        .bind(workout.workout_type.as_str())
        .bind(&workout.details)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, RepositoryError> {
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, date, duration, workout_type, details, created_at
             FROM workouts
             WHERE user_id = $1
             ORDER BY date DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(workouts)
    }
}

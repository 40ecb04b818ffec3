use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewWorkout, RepositoryError, UserRepository, WorkoutRepository};
use crate::models::{NewUser, User, Workout, ZoneConfig};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    workouts: Vec<Workout>,
}

/// In-process repository used for local runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(RepositoryError::DuplicateUsername);
        }
        if let Some(email) = &new_user.email {
            if tables.users.values().any(|u| u.email.as_ref() == Some(email)) {
                return Err(RepositoryError::DuplicateEmail);
            }
        }

        let user = User::from_new(new_user);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn update_zones(&self, user_id: Uuid, zones: &ZoneConfig) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&user_id).ok_or(RepositoryError::NotFound)?;

        user.power_zones = Some(zones.power_zones.clone());
        user.heart_rate_zones = Some(zones.heart_rate_zones.clone());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_disabled(&self, user_id: Uuid, disabled: bool) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&user_id).ok_or(RepositoryError::NotFound)?;

        user.disabled = disabled;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl WorkoutRepository for MemoryRepository {
    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&workout.user_id) {
            return Err(RepositoryError::NotFound);
        }

        let created = Workout {
            id: Uuid::new_v4(),
            user_id: workout.user_id,
            date: workout.date,
            duration: workout.duration,
            workout_type: workout.workout_type.as_str().to_string(),
            details: workout.details,
            created_at: Utc::now(),
        };
        tables.workouts.push(created.clone());
        Ok(created)
    }

    async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut workouts: Vec<Workout> = tables
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();

        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(workouts)
    }
}

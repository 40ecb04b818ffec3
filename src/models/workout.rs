use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Activity types accepted for manual workout entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Running,
    Cycling,
    Swimming,
    StrengthTraining,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
            WorkoutType::Swimming => "swimming",
            WorkoutType::StrengthTraining => "strength_training",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = InvalidWorkoutType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            "swimming" => Ok(WorkoutType::Swimming),
            "strength_training" => Ok(WorkoutType::StrengthTraining),
            _ => Err(InvalidWorkoutType),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid workout type")]
pub struct InvalidWorkoutType;

/// Stored manual workout row
#[derive(Debug, Clone, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration: i32,
    pub workout_type: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Manual workout request body; `duration` is in minutes
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkout {
    pub date: DateTime<Utc>,
    pub duration: i32,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub id: Uuid,
    pub user: String,
    pub date: DateTime<Utc>,
    pub duration: i32,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub details: Option<String>,
}

impl WorkoutResponse {
    pub fn from_workout(workout: Workout, username: &str) -> Self {
        Self {
            id: workout.id,
            user: username.to_string(),
            date: workout.date,
            duration: workout.duration,
            workout_type: workout.workout_type,
            details: workout.details,
        }
    }
}

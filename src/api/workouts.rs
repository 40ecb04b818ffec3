use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::auth::CurrentUser;
use crate::models::{CreateWorkout, InvalidWorkoutType, WorkoutResponse, WorkoutType};
use crate::repositories::{NewWorkout, WorkoutRepository};

/// Record a manually entered workout
#[tracing::instrument(skip_all, fields(user = %user.username))]
pub async fn create_workout(
    State(workouts): State<Arc<dyn WorkoutRepository>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(request), _): WithRejection<Json<CreateWorkout>, ApiError>,
) -> Result<Json<WorkoutResponse>, ApiError> {
    let workout_type: WorkoutType = request
        .workout_type
        .parse()
        .map_err(|e: InvalidWorkoutType| ApiError::BadRequest(e.to_string()))?;

    if request.duration <= 0 {
        return Err(ApiError::BadRequest("Duration must be positive".to_string()));
    }

    let workout = workouts
        .create_workout(NewWorkout {
            user_id: user.id,
            date: request.date,
            duration: request.duration,
            workout_type,
            details: request.details,
        })
        .await?;

    Ok(Json(WorkoutResponse::from_workout(workout, &user.username)))
}

pub async fn list_workouts(
    State(workouts): State<Arc<dyn WorkoutRepository>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WorkoutResponse>>, ApiError> {
    let workouts = workouts.list_workouts(user.id).await?;

    Ok(Json(
        workouts
            .into_iter()
            .map(|workout| WorkoutResponse::from_workout(workout, &user.username))
            .collect(),
    ))
}

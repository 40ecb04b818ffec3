use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::analyze::analyze_workout;
use super::auth::{create_user, login_for_access_token, read_users_me};
use super::health::{health_check, root};
use super::upload::upload_workout;
use super::workouts::{create_workout, list_workouts};
use super::zones::{configure_zones, get_zones};
use crate::auth::{cors_layer, security_headers_layer, AuthService};
use crate::repositories::{UserRepository, WorkoutRepository};
use crate::services::WorkoutStorage;

/// Headroom for multipart boundaries and part headers around the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared handler state
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth: AuthService,
    pub users: Arc<dyn UserRepository>,
    pub workouts: Arc<dyn WorkoutRepository>,
    pub storage: Arc<dyn WorkoutStorage>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        auth: AuthService,
        users: Arc<dyn UserRepository>,
        workouts: Arc<dyn WorkoutRepository>,
        storage: Arc<dyn WorkoutStorage>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            auth,
            users,
            workouts,
            storage,
            max_upload_bytes,
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/users/", post(create_user))
        .route("/users/me/", get(read_users_me))
        .route("/token", post(login_for_access_token))
        .route(
            "/upload/",
            post(upload_workout).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/analyze/", post(analyze_workout))
        .route("/zones/", get(get_zones).post(configure_zones))
        .route("/workouts/", get(list_workouts).post(create_workout))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security_headers_layer())
                .layer(cors_layer()),
        )
        .with_state(state)
}

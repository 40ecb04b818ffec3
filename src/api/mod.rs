// API routes and handlers

pub mod analyze;
pub mod auth;
pub mod error;
pub mod health;
pub mod routes;
pub mod upload;
pub mod workouts;
pub mod zones;

pub use error::ApiError;
pub use routes::{create_routes, AppState};

mod common;

use axum::http::StatusCode;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::fit::{build_fit_file, sample_ride, sample_ride_file};
use common::TestApp;
use workout_api::repositories::UserRepository;
use workout_api::services::{parse_fit, workout_key, WorkoutStorage};

#[test]
fn test_fixture_decodes_into_parallel_series() {
    let series = parse_fit(&sample_ride_file()).unwrap();

    assert_eq!(series.timestamps.len(), 3);
    assert_eq!(series.timestamps[0].to_rfc3339(), "2021-09-08T01:46:40+00:00");
    assert_eq!(series.heart_rate, vec![120, 125, 131]);
    assert_eq!(series.power, vec![180, 210, 240]);
    assert_eq!(series.speed, vec![8.25, 8.5, 8.75]);
    assert_eq!(series.distance, vec![0.0, 8.5, 17.25]);
    assert_eq!(series.calories, Some(77));
    assert_eq!(series.sport.as_deref(), Some("cycling"));
}

#[test]
fn test_file_without_session_has_no_sport() {
    let series = parse_fit(&build_fit_file(&sample_ride(), None)).unwrap();

    assert_eq!(series.timestamps.len(), 3);
    assert_eq!(series.sport, None);
}

#[tokio::test]
async fn test_upload_then_analyze() {
    let app = TestApp::new();
    let token = app.signed_in("rider").await;
    let user = app.repo.get_user_by_username("rider").await.unwrap().unwrap();

    let upload = app
        .post_file("file", &sample_ride_file(), Some(&token))
        .await;
    assert_eq!(upload.status, StatusCode::OK, "{:?}", upload.body);

    let file_id: Uuid = upload.body["file_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(app.storage.keys().await, vec![workout_key(user.id, file_id)]);

    let analysis = app
        .post_empty(&format!("/analyze/?file_id={}", file_id), Some(&token))
        .await;
    assert_eq!(analysis.status, StatusCode::OK, "{:?}", analysis.body);

    let body = analysis.body;
    assert_eq!(body["user"], "rider");
    assert_eq!(body["date"], "2021-09-08T01:46:40+00:00");
    assert_eq!(body["duration"], 3);
    assert_eq!(body["type"], "cycling");
    assert_eq!(
        body["analysis"],
        "Analysis for workout on 2021-09-08T01:46:40+00:00 for 3 records."
    );
    assert_eq!(body["llm_feedback"], "This is a placeholder for LLM feedback.");
    assert_eq!(body["analysis_graph_url"], "https://example.com/analysis_graph.png");
    assert_eq!(body["timestamps"].as_array().unwrap().len(), 3);
    assert_eq!(body["heart_rate"], serde_json::json!([120, 125, 131]));
    assert_eq!(body["power"], serde_json::json!([180, 210, 240]));
    assert_eq!(body["speed"], serde_json::json!([8.25, 8.5, 8.75]));
    assert_eq!(body["distance"], serde_json::json!([0.0, 8.5, 17.25]));
    assert_eq!(body["calories"], 77);
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .post_file("file", &sample_ride_file(), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_upload_rejects_bad_payloads() {
    let app = TestApp::new();
    let token = app.signed_in("rider").await;

    let not_fit = app
        .post_file("file", b"name,heart_rate\nrun,140\n", Some(&token))
        .await;
    assert_eq!(not_fit.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_fit.body["detail"], "Uploaded file is not a FIT file");

    let empty = app.post_file("file", b"", Some(&token)).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let wrong_field = app
        .post_file("attachment", &sample_ride_file(), Some(&token))
        .await;
    assert_eq!(wrong_field.status, StatusCode::BAD_REQUEST);

    assert!(app.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_upload_over_the_cap_is_rejected() {
    let app = TestApp::with_upload_limit(64);
    let token = app.signed_in("rider").await;

    let mut samples = sample_ride();
    samples.extend(sample_ride());
    let response = app
        .post_file("file", &build_fit_file(&samples, None), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_analyze_missing_and_malformed_ids() {
    let app = TestApp::new();
    let token = app.signed_in("rider").await;

    let missing = app
        .post_empty(&format!("/analyze/?file_id={}", Uuid::new_v4()), Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app
        .post_empty("/analyze/?file_id=not-a-uuid", Some(&token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_files_of_other_users_are_not_visible() {
    let app = TestApp::new();
    let owner = app.signed_in("owner").await;
    let intruder = app.signed_in("intruder").await;

    let upload = app
        .post_file("file", &sample_ride_file(), Some(&owner))
        .await;
    let file_id = upload.body["file_id"].as_str().unwrap().to_string();

    let response = app
        .post_empty(&format!("/analyze/?file_id={}", file_id), Some(&intruder))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_without_records_is_unprocessable() {
    let app = TestApp::new();
    let token = app.signed_in("rider").await;
    let user = app.repo.get_user_by_username("rider").await.unwrap().unwrap();

    let file_id = app
        .storage
        .upload_workout(user.id, Bytes::from(build_fit_file(&[], None)))
        .await
        .unwrap();

    let response = app
        .post_empty(&format!("/analyze/?file_id={}", file_id), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_analyze_stored_garbage_is_unprocessable() {
    let app = TestApp::new();
    let token = app.signed_in("rider").await;
    let user = app.repo.get_user_by_username("rider").await.unwrap().unwrap();

    let file_id = app
        .storage
        .upload_workout(user.id, Bytes::from_static(b"definitely not a fit file"))
        .await
        .unwrap();

    let response = app
        .post_empty(&format!("/analyze/?file_id={}", file_id), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

struct UnavailableStorage;

#[async_trait::async_trait]
impl WorkoutStorage for UnavailableStorage {
    async fn put_object(
        &self,
        _key: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> Result<(), workout_api::services::StorageError> {
        Err(anyhow::anyhow!("connection reset by peer").into())
    }

    async fn get_object(&self, _key: &str) -> Result<Bytes, workout_api::services::StorageError> {
        Err(anyhow::anyhow!("connection reset by peer").into())
    }
}

#[tokio::test]
async fn test_storage_failures_surface_as_server_errors() {
    use std::sync::Arc;
    use workout_api::api::{create_routes, AppState};
    use workout_api::auth::{AuthService, JwtService, MIN_BCRYPT_COST};
    use workout_api::repositories::MemoryRepository;

    let repo = MemoryRepository::new();
    let jwt = JwtService::new(common::TEST_SECRET, chrono::Duration::minutes(30));
    let auth = AuthService::new(Arc::new(repo.clone()), jwt).with_bcrypt_cost(MIN_BCRYPT_COST);
    let state = AppState::new(
        auth,
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(UnavailableStorage),
        1024 * 1024,
    );
    let app = TestApp {
        router: create_routes(state),
        repo,
        storage: workout_api::services::MemoryWorkoutStorage::new(),
    };
    let token = app.signed_in("rider").await;

    let upload = app
        .post_file("file", &sample_ride_file(), Some(&token))
        .await;
    assert_eq!(upload.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(upload.body["detail"], "Failed to upload file to S3");

    let analyze = app
        .post_empty(&format!("/analyze/?file_id={}", Uuid::new_v4()), Some(&token))
        .await;
    assert_eq!(analyze.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(analyze.body["detail"], "Failed to retrieve file from S3");
}

#[tokio::test]
async fn test_analyze_without_file_id_uses_detail_shape() {
    let app = TestApp::new();
    let token = app.signed_in("rider").await;

    let response = app.post_empty("/analyze/", Some(&token)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["detail"].as_str().unwrap().contains("file_id"));
}

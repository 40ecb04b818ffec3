use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// MIME type used for stored FIT files
pub const FIT_CONTENT_TYPE: &str = "application/vnd.ant.fit";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Storage key for an uploaded workout file
pub fn workout_key(user_id: Uuid, file_id: Uuid) -> String {
    format!("{}/workouts/{}.fit", user_id, file_id)
}

/// Raw object storage for uploaded workout files
#[async_trait]
pub trait WorkoutStorage: Send + Sync {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;

    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Store a workout file under a freshly generated id
    async fn upload_workout(&self, user_id: Uuid, data: Bytes) -> Result<Uuid, StorageError> {
        let file_id = Uuid::new_v4();
        self.put_object(&workout_key(user_id, file_id), data, FIT_CONTENT_TYPE)
            .await?;
        Ok(file_id)
    }

    async fn download_workout(&self, user_id: Uuid, file_id: Uuid) -> Result<Bytes, StorageError> {
        self.get_object(&workout_key(user_id, file_id)).await
    }
}

/// In-process object store used for local runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkoutStorage {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryWorkoutStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl WorkoutStorage for MemoryWorkoutStorage {
    async fn put_object(&self, key: &str, data: Bytes, _content_type: &str) -> Result<(), StorageError> {
        self.objects.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

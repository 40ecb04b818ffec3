use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use bytes::Bytes;
use tracing::{error, info};

use super::workout_storage::{StorageError, WorkoutStorage};

/// Workout file storage in S3-compatible object storage
#[derive(Debug, Clone)]
pub struct S3WorkoutStorage {
    client: S3Client,
    bucket_name: String,
}

impl S3WorkoutStorage {
    pub fn new(client: S3Client, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

#[async_trait]
impl WorkoutStorage for S3WorkoutStorage {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        info!(
            "Uploading workout to storage: bucket={}, key={}, size={}",
            self.bucket_name,
            key,
            data.len()
        );

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("S3 put_object failed for {}: {}", key, e);
                e
            })
            .context("Failed to upload workout to S3")?;

        info!("Successfully uploaded workout: {}", key);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        info!("Downloading workout from storage: {}", key);

        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_no_such_key() {
                    return Err(StorageError::NotFound(key.to_string()));
                }
                error!("S3 get_object failed for {}: {}", key, service_error);
                return Err(StorageError::Backend(
                    anyhow::Error::new(service_error).context("Failed to download workout from S3"),
                ));
            }
        };

        let data = response
            .body
            .collect()
            .await
            .context("Failed to collect workout data")?
            .into_bytes();

        info!("Successfully downloaded workout: {} bytes", data.len());
        Ok(data)
    }
}

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client as S3Client;

use super::{backend_var, optional_var, string_var};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Memory,
}

/// Object storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    /// Override for S3-compatible stores such as MinIO or LocalStack
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    pub fn from_vars<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match backend_var(lookup, "STORAGE_BACKEND", &["s3", "memory"], "s3")?.as_str() {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::S3,
        };

        Ok(StorageConfig {
            backend,
            bucket: string_var(lookup, "S3_BUCKET", "workout-uploads"),
            region: string_var(lookup, "AWS_REGION", "us-east-1"),
            endpoint_url: optional_var(lookup, "S3_ENDPOINT_URL"),
        })
    }

    /// Build an S3 client from the default AWS credential chain
    pub async fn create_s3_client(&self) -> S3Client {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        S3Client::from_conf(builder.build())
    }
}

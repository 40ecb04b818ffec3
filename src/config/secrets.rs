use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};

/// Fetch the token signing secret from AWS Secrets Manager.
///
/// The secret may be stored either as a raw string or as a JSON object with a
/// `SECRET_KEY` field.
pub async fn fetch_secret_key(secret_id: &str, region: &str) -> Result<String> {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    let client = aws_sdk_secretsmanager::Client::new(&sdk_config);

    let output = client
        .get_secret_value()
        .secret_id(secret_id)
        .send()
        .await
        .context("Failed to fetch secret from Secrets Manager")?;

    let raw = output
        .secret_string()
        .context("Secret has no string value")?;

    extract_secret_key(raw)
}

pub fn extract_secret_key(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    let key = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("SECRET_KEY")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .context("Secret JSON has no SECRET_KEY field")?,
        _ => trimmed.to_string(),
    };

    anyhow::ensure!(!key.is_empty(), "Secret value is empty");
    Ok(key)
}

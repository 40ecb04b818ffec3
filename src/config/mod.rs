// Environment-driven configuration

pub mod app;
pub mod database;
pub mod secrets;
pub mod storage;

pub use app::*;
pub use database::*;
pub use storage::*;

use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl Settings {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Resolve the token signing secret, from AWS Secrets Manager when one is
    /// configured, and fail if none is available outside development.
    pub async fn resolve_secret_key(mut self) -> Result<Self> {
        if let Some(secret_id) = self.app.secret_key_secret_id.clone() {
            if !self.app.is_development() {
                tracing::info!("Fetching signing secret from Secrets Manager: {}", secret_id);
                let secret = secrets::fetch_secret_key(&secret_id, &self.storage.region).await?;
                self.app.secret_key = Some(secret);
            }
        }

        self.app.ensure_secret_key()?;
        Ok(self)
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app: AppConfig::from_vars(&lookup)?,
            database: DatabaseConfig::from_vars(&lookup)?,
            storage: StorageConfig::from_vars(&lookup)?,
        })
    }
}

/// Read a variable and parse it, falling back to `default` when unset
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}

pub(crate) fn string_var<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn optional_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

pub(crate) fn backend_var<F>(lookup: &F, key: &str, allowed: &[&str], default: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = string_var(lookup, key, default).to_lowercase();
    if !allowed.contains(&value.as_str()) {
        bail!("Invalid value for {}: {:?} (expected one of {:?})", key, value, allowed);
    }
    Ok(value)
}

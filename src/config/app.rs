use anyhow::{bail, Result};

use super::{backend_var, optional_var, parse_var, string_var};
use crate::auth::PasswordPolicy;

const DEVELOPMENT_SECRET_KEY: &str = "development-secret-key-change-in-production";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub secret_key: Option<String>,
    pub secret_key_secret_id: Option<String>,
    pub access_token_expire_minutes: i64,
    pub max_upload_bytes: usize,
    /// Require upper/lower case, digit and symbol in new passwords
    pub strict_passwords: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("secret_key_secret_id", &self.secret_key_secret_id)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("strict_passwords", &self.strict_passwords)
            .finish()
    }
}

impl AppConfig {
    pub fn from_vars<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token_expire_minutes = parse_var(lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?;
        if access_token_expire_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let strict_passwords =
            backend_var(lookup, "PASSWORD_POLICY", &["standard", "strict"], "standard")? == "strict";

        Ok(AppConfig {
            host: string_var(lookup, "HOST", "0.0.0.0"),
            port: parse_var(lookup, "PORT", 8000)?,
            environment: string_var(lookup, "ENVIRONMENT", "development").to_lowercase(),
            log_level: string_var(lookup, "LOG_LEVEL", "info"),
            secret_key: optional_var(lookup, "SECRET_KEY"),
            secret_key_secret_id: optional_var(lookup, "SECRET_KEY_SECRET_ID"),
            access_token_expire_minutes,
            max_upload_bytes: parse_var(lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            strict_passwords,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Outside development a real signing secret must be configured
    pub fn ensure_secret_key(&self) -> Result<()> {
        if self.secret_key.is_none() && !self.is_development() {
            bail!(
                "SECRET_KEY (or SECRET_KEY_SECRET_ID) must be set when ENVIRONMENT={}",
                self.environment
            );
        }
        Ok(())
    }

    /// HS256 signing secret for access tokens
    pub fn signing_secret(&self) -> &str {
        self.secret_key.as_deref().unwrap_or(DEVELOPMENT_SECRET_KEY)
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        if self.strict_passwords {
            PasswordPolicy::strict()
        } else {
            PasswordPolicy::default()
        }
    }
}

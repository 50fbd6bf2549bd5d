//! Server configuration, read from the environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub cloudinary_url: Option<String>,
    /// In-memory store and placeholder images, no external services
    #[serde(default)]
    pub dev_mode: bool,
    /// Shared secret accepted via `X-Admin-Token` or `?token=`
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub self_ping_url: Option<String>,
    /// Older name for `self_ping_url`
    #[serde(default)]
    pub render_ping_url: Option<String>,
    #[serde(default = "default_ping_interval")]
    pub self_ping_interval_min: u64,
    /// When set, `/ping` requires `?token=` to match
    #[serde(default)]
    pub self_ping_token: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_grace")]
    pub shutdown_grace_secs: u64,
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_ping_interval() -> u64 {
    14
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_grace() -> u64 {
    10
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::default())
    }

    fn from_source(source: config::Environment) -> Result<Self> {
        let mut config: AppConfig = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read environment")?
            .try_deserialize()
            .context("Invalid configuration")?;

        // Blank variables count as unset
        for value in [
            &mut config.database_url,
            &mut config.cloudinary_url,
            &mut config.admin_token,
            &mut config.admin_username,
            &mut config.admin_password,
            &mut config.self_ping_url,
            &mut config.render_ping_url,
            &mut config.self_ping_token,
        ] {
            if value.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                *value = None;
            }
        }

        if config.self_ping_interval_min == 0 {
            config.self_ping_interval_min = default_ping_interval();
        }

        Ok(config)
    }

    /// Fail fast when production mode lacks its external services
    pub fn validate(&self) -> Result<()> {
        if self.dev_mode {
            return Ok(());
        }
        if self.database_url.is_none() || self.cloudinary_url.is_none() {
            anyhow::bail!(
                "DATABASE_URL and CLOUDINARY_URL must be set (or set DEV_MODE=true to run without external services)"
            );
        }
        Ok(())
    }

    pub fn ping_url(&self) -> Option<String> {
        self.self_ping_url
            .clone()
            .or_else(|| self.render_ping_url.clone())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.self_ping_interval_min * 60)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn admin_credentials(&self) -> (&str, &str) {
        (
            self.admin_username
                .as_deref()
                .unwrap_or(DEFAULT_ADMIN_USERNAME),
            self.admin_password
                .as_deref()
                .unwrap_or(DEFAULT_ADMIN_PASSWORD),
        )
    }

    pub fn warn_insecure_defaults(&self) {
        if self.admin_password.is_none() {
            warn!("ADMIN_PASSWORD not set, using default (insecure for production)");
        }
        if self.admin_token.is_none() {
            warn!("ADMIN_TOKEN not set, token login is disabled");
        }
    }
}

#[cfg(test)]
impl AppConfig {
    /// Development configuration used by router tests
    pub fn for_tests() -> Self {
        Self::from_source(env(&[("DEV_MODE", "true"), ("ADMIN_TOKEN", "s3cret")])).unwrap()
    }
}

#[cfg(test)]
fn env(vars: &[(&str, &str)]) -> config::Environment {
    let map: config::Map<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    config::Environment::default().source(Some(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_source(env(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert!(!config.dev_mode);
        assert_eq!(config.ping_interval(), Duration::from_secs(14 * 60));
        assert_eq!(config.admin_credentials(), ("admin", "admin123"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reads_variables() {
        let config = AppConfig::from_source(env(&[
            ("DEV_MODE", "1"),
            ("ADMIN_TOKEN", "12345"),
            ("SELF_PING_INTERVAL_MIN", "5"),
            ("RENDER_PING_URL", "https://shop.example/ping"),
            ("SELF_PING_URL", ""),
            ("STATIC_DIR", "/srv/static"),
        ]))
        .unwrap();

        assert!(config.dev_mode);
        assert_eq!(config.admin_token.as_deref(), Some("12345"));
        assert_eq!(config.ping_interval(), Duration::from_secs(300));
        assert_eq!(config.ping_url().as_deref(), Some("https://shop.example/ping"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_needs_services() {
        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "sqlite://shop.db"),
            ("CLOUDINARY_URL", "cloudinary://k:s@demo"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
    }
}

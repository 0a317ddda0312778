//! Configuration for waterworks-service.

use secrecy::Secret;
use serde::Deserialize;
use service_core::config::Config as CommonConfig;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct WaterworksConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Admin session cookie settings.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
}

/// Credentials for the superadmin created when the admins table is empty.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: Secret<String>,
}

fn default_service_name() -> String {
    "waterworks-service".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_cookie_name() -> String {
    "waterworks_session".to_string()
}

fn default_ttl_hours() -> i64 {
    12
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> Secret<String> {
    Secret::new("change-me".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

impl WaterworksConfig {
    /// Load from an optional `configuration` file overlaid with
    /// `APP__`-prefixed environment variables (e.g. `APP__DATABASE__URL`).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

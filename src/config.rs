//! Configuration management for Visiotrain server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Document store (managed document database) connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the document database REST API
    pub base_url: String,
    /// Project identifier the collections live under
    pub project_id: String,
    /// Database identifier (the managed default is "(default)")
    pub database_id: String,
    /// Bearer token used for server-to-server access
    pub access_token: String,
    /// Page size used when scanning whole collections
    pub scan_page_size: u32,
}

/// Identity provider settings (account admin API + token verification)
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    /// Base URL of the identity toolkit REST API
    pub base_url: String,
    /// Server API key for the admin endpoints
    pub api_key: String,
    /// Project identifier, used as the expected token audience
    pub project_id: String,
    /// Issuer expected in verified ID tokens
    pub issuer: String,
    /// URL publishing the provider's JWKS for RS256 verification
    pub jwks_url: String,
}

/// Distributor account policy
#[derive(Debug, Deserialize, Clone)]
pub struct DistributorsConfig {
    /// Email domain distributor logins must belong to
    pub email_domain: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub distributors: DistributorsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix VISIOTRAIN_)
            .add_source(
                Environment::with_prefix("VISIOTRAIN")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override store token from STORE_ACCESS_TOKEN env var if present
            .set_override_option(
                "store.access_token",
                env::var("STORE_ACCESS_TOKEN").ok(),
            )?
            // Override identity API key from IDENTITY_API_KEY env var if present
            .set_override_option(
                "identity.api_key",
                env::var("IDENTITY_API_KEY").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: "visiotrain-dev".to_string(),
            database_id: "(default)".to_string(),
            access_token: String::new(),
            scan_page_size: 300,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            api_key: String::new(),
            project_id: "visiotrain-dev".to_string(),
            issuer: "https://securetoken.google.com/visiotrain-dev".to_string(),
            jwks_url:
                "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
                    .to_string(),
        }
    }
}

impl Default for DistributorsConfig {
    fn default() -> Self {
        Self {
            email_domain: "visiotrain.app".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

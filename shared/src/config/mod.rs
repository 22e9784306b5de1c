//! Configuration module with one sub-module per concern
//!
//! - `database` - Host platform database connection
//! - `gateway` - SMS gateway account and token refresh
//! - `server` - HTTP server binding

pub mod database;
pub mod gateway;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use gateway::{GatewayConfig, TokenRefreshConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Host platform database configuration
    pub database: DatabaseConfig,

    /// SMS gateway account configuration
    pub gateway: GatewayConfig,

    /// Background token refresh configuration
    #[serde(default)]
    pub token_refresh: TokenRefreshConfig,
}

impl AppConfig {
    /// Load the complete configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            gateway: GatewayConfig::from_env(),
            token_refresh: TokenRefreshConfig::from_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            gateway: GatewayConfig::default(),
            token_refresh: TokenRefreshConfig::default(),
        }
    }
}

//! SMS gateway configuration module

use serde::{Deserialize, Serialize};

/// SMS gateway account configuration
///
/// The gateway exposes a login endpoint that trades these credentials
/// for a bearer token, and a send endpoint that accepts batched messages.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// API root of the gateway, without any endpoint path
    pub base_url: String,

    /// Account username for the login call
    pub username: String,

    /// Account password for the login call
    pub password: String,

    /// Sender identity approved by the gateway
    pub sender_id: String,

    /// Timeout for the login call in seconds
    pub login_timeout_secs: u64,

    /// Timeout for the send call in seconds
    pub send_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            sender_id: String::new(),
            login_timeout_secs: 10,
            send_timeout_secs: 15,
        }
    }
}

impl GatewayConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("GATEWAY_BASE_URL").unwrap_or_default();
        let username = std::env::var("GATEWAY_USERNAME").unwrap_or_default();
        let password = std::env::var("GATEWAY_PASSWORD").unwrap_or_default();
        let sender_id = std::env::var("GATEWAY_SENDER_ID").unwrap_or_default();
        let login_timeout_secs = std::env::var("GATEWAY_LOGIN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);
        let send_timeout_secs = std::env::var("GATEWAY_SEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);

        Self {
            base_url,
            username,
            password,
            sender_id,
            login_timeout_secs,
            send_timeout_secs,
        }
    }

    /// Join an endpoint path onto the configured base URL
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Names of required fields that are empty
    ///
    /// Returns an empty list when the account is fully configured.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("base URL");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.trim().is_empty() {
            missing.push("password");
        }
        if self.sender_id.trim().is_empty() {
            missing.push("sender ID");
        }
        missing
    }
}

/// Background token refresh configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenRefreshConfig {
    /// Whether the periodic refresh job runs at all
    pub enabled: bool,

    /// How often to force a refresh, in seconds
    pub interval_secs: u64,
}

impl Default for TokenRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 600,
        }
    }
}

impl TokenRefreshConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("TOKEN_REFRESH_ENABLED")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let interval_secs = std::env::var("TOKEN_REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .unwrap_or(600);

        Self {
            enabled,
            interval_secs,
        }
    }
}

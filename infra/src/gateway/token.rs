//! Bearer-token lifecycle for the SMS gateway.
//!
//! The gateway trades account credentials for an opaque bearer token at a
//! login endpoint. The manager caches the active token with its absolute
//! expiry and refreshes when the remaining lifetime drops under a 60
//! second buffer. Refreshes from independent callers may race; each
//! successful login replaces the whole state and the last writer wins.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use sf_core::errors::{SmsError, SmsResult};
use sf_shared::config::GatewayConfig;

pub(crate) const LOGIN_ENDPOINT: &str = "/auth/token";

const EXPIRY_BUFFER_SECS: i64 = 60;
const FALLBACK_TTL_SECS: i64 = 3600;
const EXCERPT_LIMIT: usize = 300;

/// A cached token and its absolute expiry
#[derive(Debug, Clone)]
pub struct TokenState {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// A token is usable while more than the buffer remains before expiry
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::seconds(EXPIRY_BUFFER_SECS)
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

/// Owns the cached token state for one gateway account
#[derive(Debug)]
pub struct TokenManager {
    http: reqwest::Client,
    config: GatewayConfig,
    state: RwLock<Option<TokenState>>,
}

impl TokenManager {
    /// Create a manager for a fully configured account
    pub fn new(config: GatewayConfig) -> SmsResult<Self> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(SmsError::config(format!(
                "Missing gateway settings: {}",
                missing.join(", ")
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.login_timeout_secs))
            .build()
            .map_err(|e| SmsError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            state: RwLock::new(None),
        })
    }

    /// Return a usable token, refreshing only when needed
    ///
    /// The cached fast path makes no network call. `force_refresh`
    /// bypasses the cache entirely.
    pub async fn get_valid_token(&self, force_refresh: bool) -> SmsResult<String> {
        if !force_refresh {
            let state = self.state.read().await;
            if let Some(state) = state.as_ref() {
                if state.is_usable_at(Utc::now()) {
                    debug!("using cached gateway token");
                    return Ok(state.token.clone());
                }
            }
        }
        self.refresh().await
    }

    /// Log in and replace the cached token state
    ///
    /// On any failure - transport error, non-success status, or a
    /// response without a token - the cached state is left untouched.
    pub async fn refresh(&self) -> SmsResult<String> {
        let url = self.config.endpoint_url(LOGIN_ENDPOINT);
        let payload = LoginPayload {
            username: &self.config.username,
            password: &self.config.password,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SmsError::transport(format!("gateway login request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SmsError::transport(format!("gateway login response unreadable: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "gateway login rejected");
            return Err(SmsError::auth(format!(
                "gateway login failed with HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let token = extract_token(&parsed).ok_or_else(|| {
            SmsError::auth(format!(
                "gateway login response did not include a token: {}",
                excerpt(&body)
            ))
        })?;

        let now = Utc::now();
        let expires_at = compute_expiry(&parsed, now);

        let mut state = self.state.write().await;
        *state = Some(TokenState {
            token: token.clone(),
            expires_at,
        });
        info!(expires_at = %expires_at, "gateway token refreshed");

        Ok(token)
    }

    /// Snapshot of the cached state, for diagnostics and tests
    pub async fn current_state(&self) -> Option<TokenState> {
        self.state.read().await.clone()
    }
}

/// Token extraction rules, tried in order:
///
/// | source        | field          |
/// |---------------|----------------|
/// | `data` object | `token`        |
/// | `data` object | `access_token` |
/// | top level     | `token`        |
/// | top level     | `access_token` |
pub(crate) fn extract_token(body: &Value) -> Option<String> {
    let data = body.get("data").filter(|v| v.is_object());
    data.and_then(|d| string_field(d, "token"))
        .or_else(|| data.and_then(|d| string_field(d, "access_token")))
        .or_else(|| string_field(body, "token"))
        .or_else(|| string_field(body, "access_token"))
}

/// Expiry rules, tried in order: `expires_at` (absolute unix seconds),
/// `expires_in` (seconds from now), then a 3600 second fallback. Each
/// field is looked up under `data` first, then at the top level.
fn compute_expiry(body: &Value, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(ts) = numeric_field(body, "expires_at") {
        if let Some(at) = DateTime::from_timestamp(ts, 0) {
            return at;
        }
    }
    if let Some(secs) = numeric_field(body, "expires_in") {
        return now + Duration::seconds(secs);
    }
    now + Duration::seconds(FALLBACK_TTL_SECS)
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Accepts numbers and numeric strings; the gateway is not consistent.
fn numeric_field(body: &Value, field: &str) -> Option<i64> {
    let data = body.get("data").filter(|v| v.is_object());
    let raw = data
        .and_then(|d| d.get(field))
        .or_else(|| body.get(field))?;
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(EXCERPT_LIMIT)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

//! Credential and network diagnostics for the gateway account.
//!
//! Neither routine sends an SMS. The credential test performs the same
//! login call the token manager uses and reports a masked excerpt of the
//! response; the IP probe finds the server's public egress address so it
//! can be allow-listed on the gateway side.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use sf_shared::config::GatewayConfig;

use crate::gateway::token::{extract_token, LOGIN_ENDPOINT};

const SENSITIVE_KEYS: [&str; 5] = ["token", "access_token", "password", "api_key", "api_secret"];
const MASK: &str = "***";
const RAW_EXCERPT_LIMIT: usize = 800;
const MASKED_EXCERPT_LIMIT: usize = 1200;
const PROBE_TIMEOUT_SECS: u64 = 8;
const PROBE_DETAIL_LIMIT: usize = 4;

/// Response format of an IP lookup endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFormat {
    Json,
    Text,
}

/// Public IP lookup endpoints, tried in order until one yields a valid address
pub const IP_LOOKUP_ENDPOINTS: [(&str, ProbeFormat); 4] = [
    ("https://api.ipify.org?format=json", ProbeFormat::Json),
    ("https://ifconfig.me/ip", ProbeFormat::Text),
    ("https://checkip.amazonaws.com", ProbeFormat::Text),
    ("https://ipinfo.io/ip", ProbeFormat::Text),
];

/// Result of the credential test
#[derive(Debug, Clone, Serialize)]
pub struct CredentialReport {
    pub ok: bool,
    pub status_code: Option<u16>,
    pub url: String,
    pub message: String,
    pub response_excerpt: String,
}

/// Optional field overrides for testing unsaved settings
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validate the gateway credentials without sending an SMS
pub async fn test_credentials(
    config: &GatewayConfig,
    overrides: &CredentialOverrides,
) -> CredentialReport {
    let base_url = effective(&overrides.base_url, &config.base_url);
    let username = effective(&overrides.username, &config.username);
    let password = effective(&overrides.password, &config.password);

    let mut missing = Vec::new();
    if base_url.is_empty() {
        missing.push("base URL");
    }
    if username.is_empty() {
        missing.push("username");
    }
    if password.is_empty() {
        missing.push("password");
    }

    let url = if base_url.is_empty() {
        String::new()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), LOGIN_ENDPOINT)
    };

    if !missing.is_empty() {
        return CredentialReport {
            ok: false,
            status_code: None,
            url,
            message: format!("Missing required fields: {}", missing.join(", ")),
            response_excerpt: String::new(),
        };
    }

    let client = match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.login_timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return CredentialReport {
                ok: false,
                status_code: None,
                url,
                message: format!("Could not build HTTP client: {e}"),
                response_excerpt: String::new(),
            }
        }
    };

    let payload = serde_json::json!({"username": username, "password": password});
    let response = match client.post(&url).json(&payload).send().await {
        Ok(response) => response,
        Err(e) => {
            return CredentialReport {
                ok: false,
                status_code: None,
                url,
                message: format!("Could not reach the gateway auth endpoint: {e}"),
                response_excerpt: String::new(),
            }
        }
    };

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let parsed: Option<Value> = serde_json::from_str(&body).ok();
    let response_excerpt = match &parsed {
        Some(value) => {
            let masked = mask_sensitive(value);
            let pretty = serde_json::to_string_pretty(&masked).unwrap_or_default();
            truncate(&pretty, MASKED_EXCERPT_LIMIT)
        }
        None => truncate(&body, RAW_EXCERPT_LIMIT),
    };

    let token = parsed.as_ref().and_then(extract_token);
    let ok = matches!(status, 200 | 201) && token.is_some();

    let message = if ok {
        "Credentials are valid. Token received from the gateway.".to_string()
    } else if matches!(status, 200 | 201) {
        "Auth endpoint responded but no token was returned. Check credentials and response format."
            .to_string()
    } else {
        failure_message(status)
    };

    CredentialReport {
        ok,
        status_code: Some(status),
        url,
        message,
        response_excerpt,
    }
}

fn effective<'a>(override_value: &'a Option<String>, configured: &'a str) -> &'a str {
    match override_value {
        Some(value) if !value.trim().is_empty() => value.trim(),
        _ => configured.trim(),
    }
}

// Human-readable classification keyed off the HTTP status
fn failure_message(status: u16) -> String {
    match status {
        405 => "Method Not Allowed. Check the API base URL. It should be the API root only, \
                without /auth/token."
            .to_string(),
        404 => "Auth endpoint not found. Verify the API base URL and version path.".to_string(),
        401 | 403 => "Authentication failed. Verify the API username and password.".to_string(),
        other => format!("Gateway auth failed with HTTP {other}."),
    }
}

/// Replace sensitive values anywhere in a JSON tree with a fixed mask
fn mask_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if SENSITIVE_KEYS.contains(&key.to_lowercase().as_str()) {
                        (key.clone(), Value::String(MASK.to_string()))
                    } else {
                        (key.clone(), mask_sensitive(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_sensitive).collect()),
        other => other.clone(),
    }
}

fn truncate(text: &str, limit: usize) -> String {
    let end = text
        .char_indices()
        .nth(limit)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].to_string()
}

/// Result of the outbound IP probe
#[derive(Debug, Clone, Serialize)]
pub struct IpProbeReport {
    pub ok: bool,
    pub ip: Option<String>,
    pub provider_url: Option<String>,
    pub message: String,
    pub details: Vec<String>,
}

/// Find the public egress IP of this server
///
/// Tries each lookup endpoint in order until one yields a syntactically
/// valid address. Used purely for gateway allow-listing diagnostics.
pub async fn probe_outbound_ip() -> IpProbeReport {
    probe_endpoints(&IP_LOOKUP_ENDPOINTS).await
}

pub(crate) async fn probe_endpoints(endpoints: &[(&str, ProbeFormat)]) -> IpProbeReport {
    let client = match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(PROBE_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return IpProbeReport {
                ok: false,
                ip: None,
                provider_url: None,
                message: format!("Could not build HTTP client: {e}"),
                details: Vec::new(),
            }
        }
    };

    let mut errors = Vec::new();

    for (url, format) in endpoints {
        let response = match client
            .get(*url)
            .header("Accept", "application/json,text/plain,*/*")
            .header("User-Agent", "smsflow_ip_probe/1.0")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                errors.push(format!("{url}: request failed ({e})"));
                continue;
            }
        };

        let status = response.status().as_u16();
        if status != 200 {
            errors.push(format!("{url}: HTTP {status}"));
            continue;
        }

        let body = response.text().await.unwrap_or_default();
        let candidate = match format {
            ProbeFormat::Json => match serde_json::from_str::<Value>(&body) {
                Ok(parsed) => parsed
                    .get("ip")
                    .or_else(|| parsed.get("query"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                Err(_) => {
                    errors.push(format!("{url}: invalid JSON response"));
                    continue;
                }
            },
            ProbeFormat::Text => body,
        };

        if let Some(ip) = extract_ip(&candidate) {
            debug!(ip = %ip, provider = url, "outbound IP detected");
            return IpProbeReport {
                ok: true,
                ip: Some(ip),
                provider_url: Some((*url).to_string()),
                message: "Outbound public IP detected from this server.".to_string(),
                details: Vec::new(),
            };
        }

        errors.push(format!("{url}: no valid IP in response"));
    }

    errors.truncate(PROBE_DETAIL_LIMIT);
    IpProbeReport {
        ok: false,
        ip: None,
        provider_url: None,
        message: "Could not determine the outbound public IP from this server.".to_string(),
        details: errors,
    }
}

// First line of the body, accepted only if it parses as an IP address
fn extract_ip(candidate: &str) -> Option<String> {
    let first_line = candidate.lines().next().unwrap_or("").trim();
    first_line
        .parse::<std::net::IpAddr>()
        .ok()
        .map(|ip| ip.to_string())
}

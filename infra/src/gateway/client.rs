//! Gateway dispatch client.
//!
//! One batched send per request: a single POST carrying the whole
//! recipient list. The gateway reports one result for the batch, so all
//! recipients share the outcome. A 401 response triggers exactly one
//! forced token refresh and retry; every other failure is terminal for
//! the attempt and is classified into a `Failed` outcome.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use sf_core::domain::value_objects::dispatch::{DispatchOutcome, DispatchRequest};
use sf_core::errors::{SmsError, SmsResult};
use sf_core::services::gateway::SmsGateway;
use sf_shared::config::GatewayConfig;

use crate::gateway::token::TokenManager;

const SEND_ENDPOINT: &str = "/messaging/send";

/// HTTP implementation of the gateway dispatch trait
pub struct HttpSmsGateway {
    http: reqwest::Client,
    config: GatewayConfig,
    tokens: Arc<TokenManager>,
}

impl HttpSmsGateway {
    pub fn new(config: GatewayConfig, tokens: Arc<TokenManager>) -> SmsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.send_timeout_secs))
            .build()
            .map_err(|e| SmsError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    async fn post(
        &self,
        url: &str,
        payload: &Value,
        token: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
    }

    // Returns the final HTTP status and body after at most one retry.
    async fn send_with_retry(&self, request: &DispatchRequest) -> SmsResult<(u16, String)> {
        let url = self.config.endpoint_url(SEND_ENDPOINT);
        let payload = build_payload(request, &self.config.sender_id);

        let token = self.tokens.get_valid_token(false).await?;
        let mut response = self
            .post(&url, &payload, &token)
            .await
            .map_err(|e| SmsError::transport(format!("gateway send request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            info!(
                message_id = %request.message_id,
                "gateway rejected the token, refreshing and retrying once"
            );
            let token = self.tokens.get_valid_token(true).await?;
            response = self
                .post(&url, &payload, &token)
                .await
                .map_err(|e| SmsError::transport(format!("gateway send retry failed: {e}")))?;
        }

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SmsError::transport(format!("gateway send response unreadable: {e}")))?;
        Ok((status, body))
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome {
        let recipient_count = request.recipients.len();
        if recipient_count == 0 {
            return DispatchOutcome::failed(0, "No valid mobile numbers provided");
        }

        match self.send_with_retry(request).await {
            Ok((status, body)) => {
                if is_success(status, &body) {
                    DispatchOutcome::sent(recipient_count, body)
                } else {
                    warn!(
                        message_id = %request.message_id,
                        status,
                        "gateway rejected the batch"
                    );
                    DispatchOutcome::failed(recipient_count, body)
                }
            }
            Err(err) => {
                error!(message_id = %request.message_id, error = %err, "gateway send failed");
                DispatchOutcome::failed(recipient_count, err.to_string())
            }
        }
    }

    fn provider_name(&self) -> &str {
        "http-gateway"
    }
}

// Provider payload. The encryption flag travels as "1"/"0" strings, and
// caller extras may override any generated field.
fn build_payload(request: &DispatchRequest, sender: &str) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "message_id".to_string(),
        Value::String(request.message_id.clone()),
    );
    payload.insert("message".to_string(), Value::String(request.message.clone()));
    payload.insert("sender".to_string(), Value::String(sender.to_string()));
    payload.insert(
        "message_type".to_string(),
        Value::String(request.message_type.as_str().to_string()),
    );
    payload.insert(
        "msisdns".to_string(),
        Value::Array(
            request
                .recipients
                .iter()
                .map(|m| Value::String(m.clone()))
                .collect(),
        ),
    );

    if let Some(dlr_url) = &request.dlr_url {
        payload.insert("dlr_url".to_string(), Value::String(dlr_url.clone()));
    }
    if let Some(encrypted) = request.encrypted {
        let flag = if encrypted { "1" } else { "0" };
        payload.insert("encrypted".to_string(), Value::String(flag.to_string()));
    }
    if let Some(method) = &request.encryption_method {
        payload.insert(
            "encryption_method".to_string(),
            Value::String(method.clone()),
        );
    }
    for (key, value) in &request.extra {
        payload.insert(key.clone(), value.clone());
    }

    Value::Object(payload)
}

// Success is HTTP 200/201 and, when the body parses as JSON, an embedded
// `status` field that is absent, null, or itself a success value.
fn is_success(status: u16, body: &str) -> bool {
    if !matches!(status, 200 | 201) {
        return false;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => embedded_status_ok(&parsed),
        Err(_) => true,
    }
}

fn embedded_status_ok(body: &Value) -> bool {
    match body.get("status") {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => matches!(n.as_i64(), Some(200 | 201)),
        Some(Value::String(s)) => matches!(s.as_str(), "200" | "201"),
        Some(_) => false,
    }
}

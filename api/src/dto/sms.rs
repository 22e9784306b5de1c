//! SMS dispatch request DTOs

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use sf_core::domain::value_objects::dispatch::MessageType;
use sf_core::domain::value_objects::recipients::RecipientInput;

/// POST /api/v1/sms/test
#[derive(Debug, Deserialize, Validate)]
pub struct SendTestRequest {
    /// Recipient number(s): a string, a delimited string, or a list
    pub to: RecipientInput,

    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,

    pub message_type: Option<MessageType>,

    #[validate(url(message = "dlr_url must be a valid URL"))]
    pub dlr_url: Option<String>,
}

/// POST /api/v1/broadcasts/send
///
/// Exactly one of `message` and `template` must be provided; the handler
/// enforces this since the rule spans two fields.
#[derive(Debug, Deserialize, Validate)]
pub struct BroadcastSendRequest {
    pub recipients: RecipientInput,

    pub message: Option<String>,

    pub template: Option<String>,

    #[serde(default)]
    pub template_values: Map<String, Value>,

    pub reference_doctype: Option<String>,

    pub reference_name: Option<String>,

    pub message_type: Option<MessageType>,

    #[validate(url(message = "dlr_url must be a valid URL"))]
    pub dlr_url: Option<String>,

    pub message_id: Option<String>,

    pub encrypted: Option<bool>,

    pub encryption_method: Option<String>,

    /// Provider-specific parameters forwarded verbatim to the gateway
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// POST /api/v1/broadcasts/resend-failed
#[derive(Debug, Deserialize, Validate)]
pub struct ResendFailedRequest {
    #[validate(length(min = 1, message = "reference_doctype is required"))]
    pub reference_doctype: String,

    #[validate(length(min = 1, message = "reference_name is required"))]
    pub reference_name: String,

    pub message: Option<String>,

    pub template: Option<String>,

    #[serde(default)]
    pub template_values: Map<String, Value>,

    pub message_type: Option<MessageType>,

    #[validate(url(message = "dlr_url must be a valid URL"))]
    pub dlr_url: Option<String>,
}

/// GET /api/v1/broadcasts/aggregate
#[derive(Debug, Deserialize)]
pub struct AggregateQuery {
    pub reference_doctype: String,
    pub reference_name: String,
}

/// POST /api/v1/templates/preview
#[derive(Debug, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(length(min = 1, message = "template is required"))]
    pub template: String,

    #[serde(default)]
    pub values: Map<String, Value>,
}

/// POST /api/v1/settings/test-credentials
///
/// All fields optional; anything omitted falls back to the configured value.
#[derive(Debug, Deserialize, Default)]
pub struct CredentialTestRequest {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

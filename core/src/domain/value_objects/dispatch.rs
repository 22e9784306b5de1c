//! Gateway dispatch request and outcome value objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::entities::sms_log::DeliveryStatus;
use crate::domain::value_objects::recipients::RecipientSet;

/// Message class forwarded to the gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[default]
    Transactional,
    Promotional,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Transactional => "Transactional",
            MessageType::Promotional => "Promotional",
        }
    }

    /// Parse the storage representation; unknown values read as Transactional
    pub fn parse(value: &str) -> Self {
        match value {
            "Promotional" => MessageType::Promotional,
            _ => MessageType::Transactional,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One batched send against the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Caller-supplied or generated unique message id
    pub message_id: String,
    /// Message body
    pub message: String,
    /// Validated recipient numbers
    pub recipients: Vec<String>,
    /// Message class
    pub message_type: MessageType,
    /// Delivery receipt callback URL
    pub dlr_url: Option<String>,
    /// Encryption flag, serialized as "1"/"0" on the wire
    pub encrypted: Option<bool>,
    /// Encryption method name when `encrypted` is set
    pub encryption_method: Option<String>,
    /// Provider-specific parameters merged into the payload
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl DispatchRequest {
    /// Build a request with a generated message id
    pub fn new(message: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            message_id: generate_message_id(),
            message: message.into(),
            recipients,
            message_type: MessageType::default(),
            dlr_url: None,
            encrypted: None,
            encryption_method: None,
            extra: Map::new(),
        }
    }
}

/// Generate an opaque unique message id
pub fn generate_message_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Batch-level result of one dispatch call
///
/// The gateway reports one result for the whole batch, so every recipient
/// shares the status: `sent_count` is all-or-nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub status: DeliveryStatus,
    pub raw_response: String,
    pub sent_count: usize,
    pub failed_count: usize,
    pub recipient_count: usize,
    pub invalid_entries: Vec<String>,
    pub duplicate_entries: Vec<String>,
}

impl DispatchOutcome {
    /// Successful batch outcome
    pub fn sent(recipient_count: usize, raw_response: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            raw_response: raw_response.into(),
            sent_count: recipient_count,
            failed_count: 0,
            recipient_count,
            invalid_entries: Vec::new(),
            duplicate_entries: Vec::new(),
        }
    }

    /// Failed batch outcome
    pub fn failed(recipient_count: usize, raw_response: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Failed,
            raw_response: raw_response.into(),
            sent_count: 0,
            failed_count: recipient_count,
            recipient_count,
            invalid_entries: Vec::new(),
            duplicate_entries: Vec::new(),
        }
    }

    /// Attach the normalizer's diagnostics to the outcome
    pub fn with_recipient_report(mut self, set: &RecipientSet) -> Self {
        self.invalid_entries = set.invalid.clone();
        self.duplicate_entries = set.duplicates.clone();
        self
    }
}

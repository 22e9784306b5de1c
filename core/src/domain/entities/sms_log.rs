//! Delivery log rows and broadcast aggregation.
//!
//! One row is written per recipient per dispatch attempt. Rows are
//! insert-only: a resend writes new rows instead of updating old ones,
//! and aggregation takes the latest row per recipient.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal delivery status shared by every recipient of one dispatch
///
/// The gateway is called once for the whole batch and does not report
/// per-recipient results, so all recipients of a dispatch share a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "Sent",
            DeliveryStatus::Failed => "Failed",
        }
    }

    /// Parse the storage representation; anything unrecognized reads as Failed
    pub fn parse(value: &str) -> Self {
        match value {
            "Sent" => DeliveryStatus::Sent,
            _ => DeliveryStatus::Failed,
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backlink from a log row to the business record a send was made for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Record type in the host platform
    pub doctype: String,
    /// Record identifier
    pub name: String,
}

impl DocumentRef {
    pub fn new(doctype: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            doctype: doctype.into(),
            name: name.into(),
        }
    }
}

/// One delivery log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsLogEntry {
    /// Recipient number, or the raw input when nothing validated
    pub msisdn: String,
    /// Message body as sent
    pub message: String,
    /// Terminal status of the dispatch attempt
    pub status: DeliveryStatus,
    /// Raw gateway response or error text
    pub response: String,
    /// When the attempt was made
    pub sent_at: DateTime<Utc>,
    /// Optional backlink to the calling business record
    pub reference: Option<DocumentRef>,
}

/// Derived status of a broadcast, from its per-recipient delivery history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BroadcastStatus {
    Draft,
    Failed,
    #[serde(rename = "Partially Sent")]
    PartiallySent,
    Sent,
}

impl BroadcastStatus {
    /// Resolve the four-way status rule from counters
    pub fn resolve(sent_count: usize, total_count: usize) -> Self {
        if total_count == 0 {
            BroadcastStatus::Draft
        } else if sent_count == 0 {
            BroadcastStatus::Failed
        } else if sent_count < total_count {
            BroadcastStatus::PartiallySent
        } else {
            BroadcastStatus::Sent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastStatus::Draft => "Draft",
            BroadcastStatus::Failed => "Failed",
            BroadcastStatus::PartiallySent => "Partially Sent",
            BroadcastStatus::Sent => "Sent",
        }
    }
}

impl std::fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery counters derived from the latest log row per recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAggregate {
    pub total_recipients: usize,
    pub sent_recipients: usize,
    pub failed_recipients: usize,
    pub status: BroadcastStatus,
}

impl BroadcastAggregate {
    /// Aggregate a latest-status-per-recipient map
    pub fn from_latest_statuses(latest: &HashMap<String, DeliveryStatus>) -> Self {
        let total_recipients = latest.len();
        let sent_recipients = latest
            .values()
            .filter(|status| **status == DeliveryStatus::Sent)
            .count();
        let failed_recipients = total_recipients - sent_recipients;

        Self {
            total_recipients,
            sent_recipients,
            failed_recipients,
            status: BroadcastStatus::resolve(sent_recipients, total_recipients),
        }
    }
}

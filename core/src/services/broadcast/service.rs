//! Broadcast service implementation

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::entities::sms_log::{
    BroadcastAggregate, DeliveryStatus, DocumentRef, SmsLogEntry,
};
use crate::domain::entities::sms_template::render_template;
use crate::domain::value_objects::dispatch::{
    generate_message_id, DispatchOutcome, DispatchRequest, MessageType,
};
use crate::domain::value_objects::recipients::{
    normalize_recipients, RecipientInput, RecipientSet,
};
use crate::errors::{SmsError, SmsResult};
use crate::repositories::{SmsLogRepository, TemplateRepository};
use crate::services::gateway::SmsGateway;

const NO_VALID_RECIPIENTS: &str = "No valid mobile numbers provided";

/// Message source for a broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BroadcastContent {
    /// Send the text as-is
    Raw(String),
    /// Render a stored template against caller-supplied values
    Template {
        name: String,
        values: Map<String, Value>,
    },
}

/// Per-send options forwarded to the gateway
#[derive(Debug, Clone, Default)]
pub struct BroadcastOptions {
    pub message_type: MessageType,
    pub dlr_url: Option<String>,
    /// Caller-supplied message id; generated when absent
    pub message_id: Option<String>,
    pub encrypted: Option<bool>,
    pub encryption_method: Option<String>,
    /// Provider-specific parameters merged into the payload
    pub extra: Map<String, Value>,
}

/// Result of one broadcast send
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastReport {
    pub message_id: String,
    pub rendered_message: String,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    /// Delivery counters for the reference, when one was given
    pub aggregate: Option<BroadcastAggregate>,
}

/// Rendered template preview
#[derive(Debug, Clone, Serialize)]
pub struct TemplatePreview {
    pub rendered_message: String,
    pub missing_placeholders: Vec<String>,
}

/// Broadcast dispatch service
pub struct BroadcastService<G, L, T>
where
    G: SmsGateway,
    L: SmsLogRepository,
    T: TemplateRepository,
{
    gateway: Arc<G>,
    logs: Arc<L>,
    templates: Arc<T>,
}

impl<G, L, T> BroadcastService<G, L, T>
where
    G: SmsGateway,
    L: SmsLogRepository,
    T: TemplateRepository,
{
    pub fn new(gateway: Arc<G>, logs: Arc<L>, templates: Arc<T>) -> Self {
        Self {
            gateway,
            logs,
            templates,
        }
    }

    /// Send one broadcast and log the outcome per recipient
    ///
    /// Validation problems (empty message, unknown template, missing
    /// template values) are returned as errors before any network call.
    /// Dispatch failures are not errors: they come back as a `Failed`
    /// outcome inside the report.
    pub async fn send(
        &self,
        recipients: &RecipientInput,
        content: &BroadcastContent,
        reference: Option<&DocumentRef>,
        options: &BroadcastOptions,
    ) -> SmsResult<BroadcastReport> {
        let message = self.resolve_message(content).await?;
        let set = normalize_recipients(recipients);

        if set.valid.is_empty() {
            return self
                .record_empty_batch(recipients, &set, message, reference, options)
                .await;
        }

        let request = build_request(&message, &set, options);
        let outcome = self
            .gateway
            .dispatch(&request)
            .await
            .with_recipient_report(&set);

        info!(
            message_id = %request.message_id,
            recipients = set.valid.len(),
            status = %outcome.status,
            "broadcast dispatched"
        );

        let sent_at = Utc::now();
        let entries: Vec<SmsLogEntry> = set
            .valid
            .iter()
            .map(|msisdn| SmsLogEntry {
                msisdn: msisdn.clone(),
                message: message.clone(),
                status: outcome.status,
                response: outcome.raw_response.clone(),
                sent_at,
                reference: reference.cloned(),
            })
            .collect();
        self.logs.insert_many(&entries).await?;

        let aggregate = self.aggregate_for(reference).await?;
        Ok(BroadcastReport {
            message_id: request.message_id,
            rendered_message: message,
            outcome,
            aggregate,
        })
    }

    /// Resend to the recipients whose latest logged status is not Sent
    pub async fn resend_failed(
        &self,
        reference: &DocumentRef,
        content: &BroadcastContent,
        options: &BroadcastOptions,
    ) -> SmsResult<BroadcastReport> {
        let latest = self.logs.latest_status_by_recipient(reference).await?;
        let failed: Vec<String> = latest
            .iter()
            .filter(|(_, status)| **status != DeliveryStatus::Sent)
            .map(|(msisdn, _)| msisdn.clone())
            .collect();

        if failed.is_empty() {
            return Err(SmsError::validation(
                "No failed recipients found for this broadcast",
            ));
        }

        self.send(
            &RecipientInput::List(failed),
            content,
            Some(reference),
            options,
        )
        .await
    }

    /// Delivery counters for a business record
    pub async fn aggregate(&self, reference: &DocumentRef) -> SmsResult<BroadcastAggregate> {
        let latest = self.logs.latest_status_by_recipient(reference).await?;
        Ok(BroadcastAggregate::from_latest_statuses(&latest))
    }

    /// Render a stored template against values without sending anything
    pub async fn preview(
        &self,
        template_name: &str,
        values: &Map<String, Value>,
    ) -> SmsResult<TemplatePreview> {
        let template = self
            .templates
            .find_by_name(template_name)
            .await?
            .ok_or_else(|| {
                SmsError::validation(format!("SMS template '{template_name}' does not exist"))
            })?;
        if template.body.trim().is_empty() {
            return Err(SmsError::validation(format!(
                "SMS template '{template_name}' has no message content"
            )));
        }

        let (rendered_message, missing_placeholders) = render_template(&template.body, values);
        Ok(TemplatePreview {
            rendered_message,
            missing_placeholders,
        })
    }

    // Nothing validated: no network call, one Failed row carrying the raw
    // input so operators can see what arrived.
    async fn record_empty_batch(
        &self,
        recipients: &RecipientInput,
        set: &RecipientSet,
        message: String,
        reference: Option<&DocumentRef>,
        options: &BroadcastOptions,
    ) -> SmsResult<BroadcastReport> {
        warn!(
            entered = set.entered_count,
            invalid = set.invalid.len(),
            "broadcast had no valid recipients"
        );

        let entry = SmsLogEntry {
            msisdn: recipients.raw_display(),
            message: message.clone(),
            status: DeliveryStatus::Failed,
            response: NO_VALID_RECIPIENTS.to_string(),
            sent_at: Utc::now(),
            reference: reference.cloned(),
        };
        self.logs.insert_many(&[entry]).await?;

        let outcome = DispatchOutcome::failed(0, NO_VALID_RECIPIENTS).with_recipient_report(set);
        let aggregate = self.aggregate_for(reference).await?;
        Ok(BroadcastReport {
            message_id: options
                .message_id
                .clone()
                .unwrap_or_else(generate_message_id),
            rendered_message: message,
            outcome,
            aggregate,
        })
    }

    async fn aggregate_for(
        &self,
        reference: Option<&DocumentRef>,
    ) -> SmsResult<Option<BroadcastAggregate>> {
        match reference {
            Some(reference) => Ok(Some(self.aggregate(reference).await?)),
            None => Ok(None),
        }
    }

    async fn resolve_message(&self, content: &BroadcastContent) -> SmsResult<String> {
        match content {
            BroadcastContent::Raw(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(SmsError::validation(
                        "Message is required. Enter a message or choose a template.",
                    ));
                }
                Ok(trimmed.to_string())
            }
            BroadcastContent::Template { name, values } => {
                let template = self.templates.find_by_name(name).await?.ok_or_else(|| {
                    SmsError::validation(format!("SMS template '{name}' does not exist"))
                })?;
                if !template.enabled {
                    return Err(SmsError::validation(format!(
                        "SMS template '{name}' is disabled"
                    )));
                }
                if template.body.trim().is_empty() {
                    return Err(SmsError::validation(format!(
                        "SMS template '{name}' has no message content"
                    )));
                }

                let (rendered, missing) = render_template(&template.body, values);
                if !missing.is_empty() {
                    return Err(SmsError::validation(format!(
                        "Missing template values for: {}",
                        missing.join(", ")
                    )));
                }
                Ok(rendered.trim().to_string())
            }
        }
    }
}

fn build_request(
    message: &str,
    set: &RecipientSet,
    options: &BroadcastOptions,
) -> DispatchRequest {
    let mut request = DispatchRequest::new(message, set.valid.clone());
    if let Some(id) = &options.message_id {
        request.message_id = id.clone();
    }
    request.message_type = options.message_type;
    request.dlr_url = options.dlr_url.clone();
    request.encrypted = options.encrypted;
    request.encryption_method = options.encryption_method.clone();
    request.extra = options.extra.clone();
    request
}

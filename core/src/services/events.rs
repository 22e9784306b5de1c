//! Document-event dispatch
//!
//! The host platform fires an event for every document transition. This
//! service filters the enabled templates listening to that document type,
//! renders each against the document values, and dispatches to the
//! recipients the template resolves. One template failing to send does
//! not stop the others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::entities::sms_log::DocumentRef;
use crate::domain::entities::sms_template::{render_template, SmsTemplate};
use crate::domain::value_objects::recipients::RecipientInput;
use crate::errors::SmsResult;
use crate::repositories::{SmsLogRepository, TemplateRepository};
use crate::services::broadcast::{BroadcastContent, BroadcastOptions, BroadcastReport, BroadcastService};
use crate::services::gateway::SmsGateway;

/// A document transition reported by the host platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEvent {
    /// Document type, e.g. "Sales Order"
    pub doctype: String,
    /// Document identifier
    pub name: String,
    /// Host event name, e.g. "on_submit"
    pub event: String,
    /// Current field values of the document
    pub values: Map<String, Value>,
    /// Field values before the transition, when the host provides them
    pub previous: Option<Map<String, Value>>,
}

/// Outcome of one template fired by an event
#[derive(Debug, Clone, Serialize)]
pub struct TemplateFireReport {
    pub template: String,
    pub report: BroadcastReport,
}

/// Document-event dispatch service
pub struct DocumentEventService<G, L, T>
where
    G: SmsGateway,
    L: SmsLogRepository,
    T: TemplateRepository,
{
    broadcast: Arc<BroadcastService<G, L, T>>,
    templates: Arc<T>,
}

impl<G, L, T> DocumentEventService<G, L, T>
where
    G: SmsGateway,
    L: SmsLogRepository,
    T: TemplateRepository,
{
    pub fn new(broadcast: Arc<BroadcastService<G, L, T>>, templates: Arc<T>) -> Self {
        Self {
            broadcast,
            templates,
        }
    }

    /// Dispatch every matching template for a document event
    ///
    /// Returns one report per fired template. Templates whose send fails
    /// validation (for example an empty body) are skipped with a warning
    /// so the remaining templates still fire.
    pub async fn handle_event(&self, event: &DocumentEvent) -> SmsResult<Vec<TemplateFireReport>> {
        let templates = self
            .templates
            .find_enabled_for_doctype(&event.doctype)
            .await?;
        let reference = DocumentRef::new(event.doctype.clone(), event.name.clone());
        let mut reports = Vec::new();

        for template in templates {
            if !template.matches_event(&event.event, &event.values, event.previous.as_ref()) {
                continue;
            }

            let recipients = collect_recipients(&template, &event.values);

            // Event-path rendering resolves against the document itself;
            // unresolved placeholders stay in the body instead of failing.
            let (rendered, missing) = render_template(&template.body, &event.values);
            if !missing.is_empty() {
                debug!(
                    template = %template.name,
                    missing = ?missing,
                    "placeholders left unresolved"
                );
            }

            let options = BroadcastOptions {
                message_type: template.message_type,
                dlr_url: template.dlr_url.clone(),
                ..Default::default()
            };

            match self
                .broadcast
                .send(
                    &RecipientInput::List(recipients),
                    &BroadcastContent::Raw(rendered),
                    Some(&reference),
                    &options,
                )
                .await
            {
                Ok(report) => reports.push(TemplateFireReport {
                    template: template.name.clone(),
                    report,
                }),
                Err(err) => {
                    warn!(
                        template = %template.name,
                        error = %err,
                        "template dispatch failed"
                    );
                }
            }
        }

        Ok(reports)
    }
}

// Recipient sources, in order: the document field the template points at,
// then the template's own static recipient list.
fn collect_recipients(template: &SmsTemplate, values: &Map<String, Value>) -> Vec<String> {
    let mut recipients = Vec::new();

    if let Some(field) = &template.phone_field {
        match values.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => recipients.push(s.clone()),
            Some(Value::Number(n)) => recipients.push(n.to_string()),
            Some(Value::Array(items)) => {
                for item in items {
                    match item {
                        Value::String(s) if !s.trim().is_empty() => recipients.push(s.clone()),
                        Value::Number(n) => recipients.push(n.to_string()),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(static_list) = &template.static_recipients {
        recipients.extend(
            static_list
                .split(|c| matches!(c, ',' | ';' | '\n'))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }

    recipients
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::entities::sms_log::DeliveryStatus;
    use crate::domain::entities::sms_template::TriggerEvent;
    use crate::domain::value_objects::dispatch::MessageType;
    use crate::test_support::{InMemorySmsLogRepository, InMemoryTemplateRepository, MockGateway};

    fn template(trigger: TriggerEvent) -> SmsTemplate {
        SmsTemplate {
            name: "delivery-update".to_string(),
            body: "Order {{order_no}} is {{status}}".to_string(),
            enabled: true,
            document_type: "Sales Order".to_string(),
            trigger_event: trigger,
            value_change_field: Some("status".to_string()),
            phone_field: Some("customer_phone".to_string()),
            static_recipients: None,
            message_type: MessageType::Transactional,
            dlr_url: None,
        }
    }

    fn service_with(
        templates: Vec<SmsTemplate>,
    ) -> (
        DocumentEventService<MockGateway, InMemorySmsLogRepository, InMemoryTemplateRepository>,
        Arc<MockGateway>,
    ) {
        let gateway = Arc::new(MockGateway::sending());
        let logs = Arc::new(InMemorySmsLogRepository::new());
        let repo = Arc::new(InMemoryTemplateRepository::with_templates(templates));
        let broadcast = Arc::new(BroadcastService::new(gateway.clone(), logs, repo.clone()));
        (DocumentEventService::new(broadcast, repo), gateway)
    }

    fn event(event_name: &str) -> DocumentEvent {
        let mut values = Map::new();
        values.insert("order_no".to_string(), json!("SO-0001"));
        values.insert("status".to_string(), json!("Delivered"));
        values.insert("customer_phone".to_string(), json!("+254712345678"));

        DocumentEvent {
            doctype: "Sales Order".to_string(),
            name: "SO-0001".to_string(),
            event: event_name.to_string(),
            values,
            previous: None,
        }
    }

    #[tokio::test]
    async fn fires_matching_template_with_rendered_body() {
        let (service, gateway) = service_with(vec![template(TriggerEvent::OnSubmit)]);

        let reports = service.handle_event(&event("on_submit")).await.unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].template, "delivery-update");
        assert_eq!(
            reports[0].report.rendered_message,
            "Order SO-0001 is Delivered"
        );
        assert_eq!(reports[0].report.outcome.status, DeliveryStatus::Sent);

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].recipients, vec!["254712345678".to_string()]);
    }

    #[tokio::test]
    async fn skips_non_matching_event() {
        let (service, gateway) = service_with(vec![template(TriggerEvent::OnSubmit)]);

        let reports = service.handle_event(&event("on_cancel")).await.unwrap();

        assert!(reports.is_empty());
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn value_change_fires_only_when_the_field_changed() {
        let (service, gateway) = service_with(vec![template(TriggerEvent::ValueChange)]);

        let mut unchanged = event("on_update_after_submit");
        unchanged.previous = Some(unchanged.values.clone());
        assert!(service
            .handle_event(&unchanged)
            .await
            .unwrap()
            .is_empty());

        let mut changed = event("on_update_after_submit");
        let mut previous = changed.values.clone();
        previous.insert("status".to_string(), json!("In Transit"));
        changed.previous = Some(previous);

        let reports = service.handle_event(&changed).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(gateway.requests().len(), 1);
    }

    #[tokio::test]
    async fn static_recipients_are_merged_with_the_document_field() {
        let mut t = template(TriggerEvent::OnSubmit);
        t.static_recipients = Some("254700000009; 254700000010".to_string());
        let (service, gateway) = service_with(vec![t]);

        service.handle_event(&event("on_submit")).await.unwrap();

        let requests = gateway.requests();
        assert_eq!(
            requests[0].recipients,
            vec![
                "254712345678".to_string(),
                "254700000009".to_string(),
                "254700000010".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn missing_phone_field_still_writes_a_failed_log() {
        let (service, gateway) = service_with(vec![template(TriggerEvent::OnSubmit)]);

        let mut ev = event("on_submit");
        ev.values.remove("customer_phone");

        let reports = service.handle_event(&ev).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].report.outcome.status, DeliveryStatus::Failed);
        assert!(gateway.requests().is_empty());
    }
}

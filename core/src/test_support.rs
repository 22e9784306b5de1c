//! Mock implementations shared by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entities::sms_log::{DeliveryStatus, DocumentRef, SmsLogEntry};
use crate::domain::entities::sms_template::SmsTemplate;
use crate::domain::value_objects::dispatch::{DispatchOutcome, DispatchRequest};
use crate::errors::SmsResult;
use crate::repositories::{SmsLogRepository, TemplateRepository};
use crate::services::gateway::SmsGateway;

/// Scripted gateway that records every request it receives
pub struct MockGateway {
    fail: bool,
    requests: Mutex<Vec<DispatchRequest>>,
}

impl MockGateway {
    pub fn sending() -> Self {
        Self {
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsGateway for MockGateway {
    async fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            DispatchOutcome::failed(request.recipients.len(), r#"{"status":500}"#)
        } else {
            DispatchOutcome::sent(request.recipients.len(), r#"{"status":200}"#)
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// In-memory delivery log, ordered by insertion
#[derive(Default)]
pub struct InMemorySmsLogRepository {
    rows: Mutex<Vec<SmsLogEntry>>,
}

impl InMemorySmsLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<SmsLogEntry> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsLogRepository for InMemorySmsLogRepository {
    async fn insert_many(&self, entries: &[SmsLogEntry]) -> SmsResult<()> {
        self.rows.lock().unwrap().extend_from_slice(entries);
        Ok(())
    }

    async fn latest_status_by_recipient(
        &self,
        reference: &DocumentRef,
    ) -> SmsResult<HashMap<String, DeliveryStatus>> {
        let rows = self.rows.lock().unwrap();
        let mut latest = HashMap::new();
        for row in rows.iter() {
            if row.reference.as_ref() == Some(reference) {
                latest.insert(row.msisdn.clone(), row.status);
            }
        }
        Ok(latest)
    }
}

/// Fixed template catalogue
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: Vec<SmsTemplate>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<SmsTemplate>) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_name(&self, name: &str) -> SmsResult<Option<SmsTemplate>> {
        Ok(self
            .templates
            .iter()
            .find(|template| template.name == name)
            .cloned())
    }

    async fn find_enabled_for_doctype(&self, doctype: &str) -> SmsResult<Vec<SmsTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|template| template.enabled && template.document_type == doctype)
            .cloned()
            .collect())
    }
}

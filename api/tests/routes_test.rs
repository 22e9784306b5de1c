//! Route wiring tests running the full HTTP surface against mock services

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::{test, web};
use async_trait::async_trait;
use serde_json::{json, Value};

use sf_api::app::create_app;
use sf_api::state::AppState;
use sf_core::domain::entities::sms_log::{DeliveryStatus, DocumentRef, SmsLogEntry};
use sf_core::domain::entities::sms_template::{SmsTemplate, TriggerEvent};
use sf_core::domain::value_objects::dispatch::{DispatchOutcome, DispatchRequest, MessageType};
use sf_core::errors::SmsResult;
use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::broadcast::BroadcastService;
use sf_core::services::events::DocumentEventService;
use sf_core::services::gateway::SmsGateway;
use sf_shared::config::GatewayConfig;

struct MockGateway;

#[async_trait]
impl SmsGateway for MockGateway {
    async fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome {
        DispatchOutcome::sent(request.recipients.len(), r#"{"status":200}"#)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[derive(Default)]
struct InMemoryLogs {
    rows: Mutex<Vec<SmsLogEntry>>,
}

#[async_trait]
impl SmsLogRepository for InMemoryLogs {
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

struct FixedTemplates {
    templates: Vec<SmsTemplate>,
}

#[async_trait]
impl TemplateRepository for FixedTemplates {
    async fn find_by_name(&self, name: &str) -> SmsResult<Option<SmsTemplate>> {
        Ok(self.templates.iter().find(|t| t.name == name).cloned())
    }

    async fn find_enabled_for_doctype(&self, doctype: &str) -> SmsResult<Vec<SmsTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.enabled && t.document_type == doctype)
            .cloned()
            .collect())
    }
}

fn welcome_template() -> SmsTemplate {
    SmsTemplate {
        name: "welcome".to_string(),
        body: "Welcome {{name}}, your code is {{code}}".to_string(),
        enabled: true,
        document_type: "Customer".to_string(),
        trigger_event: TriggerEvent::OnSubmit,
        value_change_field: None,
        phone_field: Some("mobile_no".to_string()),
        static_recipients: None,
        message_type: MessageType::Transactional,
        dlr_url: None,
    }
}

type MockState = AppState<MockGateway, InMemoryLogs, FixedTemplates>;

fn mock_state() -> (web::Data<MockState>, web::Data<GatewayConfig>) {
    let gateway = Arc::new(MockGateway);
    let logs = Arc::new(InMemoryLogs::default());
    let templates = Arc::new(FixedTemplates {
        templates: vec![welcome_template()],
    });
    let broadcast = Arc::new(BroadcastService::new(gateway, logs, templates.clone()));
    let events = Arc::new(DocumentEventService::new(broadcast.clone(), templates));

    (
        web::Data::new(AppState::new(broadcast, events)),
        web::Data::new(GatewayConfig::default()),
    )
}

#[actix_rt::test]
async fn health_check_responds() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
        .await;
    assert!(response.status().is_success());
}

#[actix_rt::test]
async fn send_test_dispatches_and_reports() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/sms/test")
        .set_json(json!({
            "to": "254712345678, 254712345679",
            "message": "ping"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["status"], json!("Sent"));
    assert_eq!(body["recipient_count"], json!(2));
    assert_eq!(body["sent_count"], json!(2));
}

#[actix_rt::test]
async fn send_test_rejects_an_empty_message() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/sms/test")
        .set_json(json!({"to": "254712345678", "message": ""}))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn broadcast_send_requires_a_content_source() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/broadcasts/send")
        .set_json(json!({"recipients": ["254712345678"]}))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn broadcast_send_with_a_template_renders_it() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/broadcasts/send")
        .set_json(json!({
            "recipients": ["254712345678"],
            "template": "welcome",
            "template_values": {"name": "Amina", "code": "1234"},
            "reference_doctype": "Customer",
            "reference_name": "CUST-0001"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        body["rendered_message"],
        json!("Welcome Amina, your code is 1234")
    );
    assert_eq!(body["aggregate"]["status"], json!("Sent"));
    assert_eq!(body["aggregate"]["total_recipients"], json!(1));
}

#[actix_rt::test]
async fn resend_failed_with_no_failures_is_a_bad_request() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/broadcasts/resend-failed")
        .set_json(json!({
            "reference_doctype": "Customer",
            "reference_name": "CUST-0001",
            "message": "try again"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn aggregate_of_an_unsent_record_is_draft() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::get()
        .uri("/api/v1/broadcasts/aggregate?reference_doctype=Customer&reference_name=CUST-0009")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["status"], json!("Draft"));
    assert_eq!(body["total_recipients"], json!(0));
}

#[actix_rt::test]
async fn template_preview_reports_missing_placeholders() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/templates/preview")
        .set_json(json!({
            "template": "welcome",
            "values": {"name": "Amina"}
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        body["rendered_message"],
        json!("Welcome Amina, your code is {{code}}")
    );
    assert_eq!(body["missing_placeholders"], json!(["code"]));
}

#[actix_rt::test]
async fn document_event_fires_matching_templates() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/events/document")
        .set_json(json!({
            "doctype": "Customer",
            "name": "CUST-0001",
            "event": "on_submit",
            "values": {
                "name": "Amina",
                "code": "9876",
                "mobile_no": "+254712345678"
            }
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    let reports = body.as_array().expect("array of reports");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["template"], json!("welcome"));
    assert_eq!(reports[0]["report"]["status"], json!("Sent"));
}

#[actix_rt::test]
async fn document_event_requires_identifiers() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/events/document")
        .set_json(json!({
            "doctype": "",
            "name": "CUST-0001",
            "event": "on_submit",
            "values": {}
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn credential_test_reports_missing_configuration() {
    let (state, config) = mock_state();
    let app = test::init_service(create_app(state, config)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/settings/test-credentials")
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["ok"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Missing required fields"));
}

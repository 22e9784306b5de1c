//! Broadcast send, resend, and aggregate routes

use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};
use validator::Validate;

use sf_core::domain::entities::sms_log::DocumentRef;
use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::broadcast::{BroadcastContent, BroadcastOptions};
use sf_core::services::gateway::SmsGateway;

use crate::dto::{AggregateQuery, BroadcastSendRequest, ResendFailedRequest};
use crate::handlers::error::{bad_request, error_response, validation_failure};
use crate::state::AppState;

// Exactly one of `message` / `template` selects the content source.
fn resolve_content(
    message: &Option<String>,
    template: &Option<String>,
    template_values: &Map<String, Value>,
) -> Result<BroadcastContent, HttpResponse> {
    match (message, template) {
        (_, Some(template)) => Ok(BroadcastContent::Template {
            name: template.clone(),
            values: template_values.clone(),
        }),
        (Some(message), None) => Ok(BroadcastContent::Raw(message.clone())),
        (None, None) => Err(bad_request(
            "Provide either a message or a template to send.",
        )),
    }
}

// A backlink needs both halves or neither.
fn resolve_reference(
    doctype: &Option<String>,
    name: &Option<String>,
) -> Result<Option<DocumentRef>, HttpResponse> {
    match (doctype, name) {
        (Some(doctype), Some(name)) => Ok(Some(DocumentRef::new(doctype.clone(), name.clone()))),
        (None, None) => Ok(None),
        _ => Err(bad_request(
            "reference_doctype and reference_name must be provided together.",
        )),
    }
}

/// Handler for POST /api/v1/broadcasts/send
pub async fn send<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    request: web::Json<BroadcastSendRequest>,
) -> HttpResponse
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }
    let content = match resolve_content(
        &request.message,
        &request.template,
        &request.template_values,
    ) {
        Ok(content) => content,
        Err(response) => return response,
    };
    let reference = match resolve_reference(&request.reference_doctype, &request.reference_name) {
        Ok(reference) => reference,
        Err(response) => return response,
    };

    let options = BroadcastOptions {
        message_type: request.message_type.unwrap_or_default(),
        dlr_url: request.dlr_url.clone(),
        message_id: request.message_id.clone(),
        encrypted: request.encrypted,
        encryption_method: request.encryption_method.clone(),
        extra: request.extra.clone(),
    };

    match state
        .broadcast
        .send(&request.recipients, &content, reference.as_ref(), &options)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => error_response(&err),
    }
}

/// Handler for POST /api/v1/broadcasts/resend-failed
///
/// Re-targets only the recipients whose latest logged status for the
/// reference is not Sent.
pub async fn resend_failed<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    request: web::Json<ResendFailedRequest>,
) -> HttpResponse
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }
    let content = match resolve_content(
        &request.message,
        &request.template,
        &request.template_values,
    ) {
        Ok(content) => content,
        Err(response) => return response,
    };

    let reference = DocumentRef::new(
        request.reference_doctype.clone(),
        request.reference_name.clone(),
    );
    let options = BroadcastOptions {
        message_type: request.message_type.unwrap_or_default(),
        dlr_url: request.dlr_url.clone(),
        ..Default::default()
    };

    match state
        .broadcast
        .resend_failed(&reference, &content, &options)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => error_response(&err),
    }
}

/// Handler for GET /api/v1/broadcasts/aggregate
pub async fn aggregate<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    query: web::Query<AggregateQuery>,
) -> HttpResponse
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    let reference = DocumentRef::new(query.reference_doctype.clone(), query.reference_name.clone());
    match state.broadcast.aggregate(&reference).await {
        Ok(aggregate) => HttpResponse::Ok().json(aggregate),
        Err(err) => error_response(&err),
    }
}

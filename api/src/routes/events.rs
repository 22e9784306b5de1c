//! Document-event dispatch route

use actix_web::{web, HttpResponse};

use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::events::DocumentEvent;
use sf_core::services::gateway::SmsGateway;

use crate::handlers::error::{bad_request, error_response};
use crate::state::AppState;

/// Handler for POST /api/v1/events/document
///
/// Called by the host platform on document transitions. Fires every
/// enabled template matching the document type and event, and returns
/// one report per fired template.
pub async fn document_event<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    request: web::Json<DocumentEvent>,
) -> HttpResponse
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    if request.doctype.trim().is_empty() || request.name.trim().is_empty() {
        return bad_request("doctype and name are required.");
    }
    if request.event.trim().is_empty() {
        return bad_request("event is required.");
    }

    match state.events.handle_event(&request).await {
        Ok(reports) => HttpResponse::Ok().json(reports),
        Err(err) => error_response(&err),
    }
}

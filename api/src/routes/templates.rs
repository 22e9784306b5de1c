//! Template preview route

use actix_web::{web, HttpResponse};
use validator::Validate;

use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::gateway::SmsGateway;

use crate::dto::PreviewRequest;
use crate::handlers::error::{error_response, validation_failure};
use crate::state::AppState;

/// Handler for POST /api/v1/templates/preview
///
/// Renders a stored template against the supplied values and reports the
/// placeholders left unresolved. Nothing is sent.
pub async fn preview<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    request: web::Json<PreviewRequest>,
) -> HttpResponse
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    match state
        .broadcast
        .preview(&request.template, &request.values)
        .await
    {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(err) => error_response(&err),
    }
}

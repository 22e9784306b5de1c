//! Manual test sends

use actix_web::{web, HttpResponse};
use validator::Validate;

use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::broadcast::{BroadcastContent, BroadcastOptions};
use sf_core::services::gateway::SmsGateway;

use crate::dto::SendTestRequest;
use crate::handlers::error::{error_response, validation_failure};
use crate::state::AppState;

/// Handler for POST /api/v1/sms/test
///
/// Sends a message to the given recipients without a business-record
/// backlink. Intended for operators verifying the gateway account.
pub async fn send_test<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    request: web::Json<SendTestRequest>,
) -> HttpResponse
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    let options = BroadcastOptions {
        message_type: request.message_type.unwrap_or_default(),
        dlr_url: request.dlr_url.clone(),
        ..Default::default()
    };

    match state
        .broadcast
        .send(
            &request.to,
            &BroadcastContent::Raw(request.message.clone()),
            None,
            &options,
        )
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => error_response(&err),
    }
}

//! Gateway account diagnostics routes

use actix_web::{web, HttpResponse};

use sf_infra::gateway::{probe_outbound_ip, test_credentials, CredentialOverrides};
use sf_shared::config::GatewayConfig;

use crate::dto::CredentialTestRequest;

/// Handler for POST /api/v1/settings/test-credentials
///
/// Performs a login call with the configured account (or the supplied
/// overrides) and returns a masked excerpt of the response. No SMS is sent.
pub async fn credentials(
    config: web::Data<GatewayConfig>,
    request: web::Json<CredentialTestRequest>,
) -> HttpResponse {
    let overrides = CredentialOverrides {
        base_url: request.base_url.clone(),
        username: request.username.clone(),
        password: request.password.clone(),
    };
    let report = test_credentials(&config, &overrides).await;
    HttpResponse::Ok().json(report)
}

/// Handler for GET /api/v1/settings/outbound-ip
///
/// Reports the server's public egress IP for gateway allow-listing.
pub async fn outbound_ip() -> HttpResponse {
    let report = probe_outbound_ip().await;
    HttpResponse::Ok().json(report)
}

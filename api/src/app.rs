//! Application factory
//!
//! Builds the Actix-web application with its routes and injected
//! services. Kept generic over the service traits so tests can run the
//! full HTTP surface against mock implementations.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::gateway::SmsGateway;
use sf_shared::config::GatewayConfig;

use crate::routes;
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<G, L, T>(
    state: web::Data<AppState<G, L, T>>,
    gateway_config: web::Data<GatewayConfig>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    G: SmsGateway + 'static,
    L: SmsLogRepository + 'static,
    T: TemplateRepository + 'static,
{
    App::new()
        // Add application state
        .app_data(state)
        .app_data(gateway_config)
        // Request logging
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // Versioned API surface for the host platform
        .service(
            web::scope("/api/v1")
                .route("/sms/test", web::post().to(routes::sms::send_test::<G, L, T>))
                .route(
                    "/broadcasts/send",
                    web::post().to(routes::broadcasts::send::<G, L, T>),
                )
                .route(
                    "/broadcasts/resend-failed",
                    web::post().to(routes::broadcasts::resend_failed::<G, L, T>),
                )
                .route(
                    "/broadcasts/aggregate",
                    web::get().to(routes::broadcasts::aggregate::<G, L, T>),
                )
                .route(
                    "/templates/preview",
                    web::post().to(routes::templates::preview::<G, L, T>),
                )
                .route(
                    "/events/document",
                    web::post().to(routes::events::document_event::<G, L, T>),
                )
                .route(
                    "/settings/test-credentials",
                    web::post().to(routes::settings::credentials),
                )
                .route(
                    "/settings/outbound-ip",
                    web::get().to(routes::settings::outbound_ip),
                ),
        )
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "smsflow-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

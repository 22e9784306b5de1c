use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{error, info};

use sf_api::app::create_app;
use sf_api::scheduler;
use sf_api::state::AppState;
use sf_core::errors::SmsError;
use sf_core::services::broadcast::BroadcastService;
use sf_core::services::events::DocumentEventService;
use sf_infra::database::{connect, MySqlSmsLogRepository, MySqlTemplateRepository};
use sf_infra::gateway::{HttpSmsGateway, TokenManager};
use sf_shared::config::AppConfig;

type Services = AppState<HttpSmsGateway, MySqlSmsLogRepository, MySqlTemplateRepository>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting SmsFlow API server");

    let config = AppConfig::from_env();

    let (state, token_manager) = match build_services(&config).await {
        Ok(built) => built,
        Err(err) => {
            error!("Failed to initialize services: {err}");
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                err.to_string(),
            ));
        }
    };

    // Background token refresh, independent of in-flight sends
    scheduler::spawn_token_refresh(token_manager, config.token_refresh.clone());

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let gateway_config = web::Data::new(config.gateway.clone());
    HttpServer::new(move || create_app(state.clone(), gateway_config.clone()))
        .bind(&bind_address)?
        .run()
        .await
}

async fn build_services(
    config: &AppConfig,
) -> Result<(web::Data<Services>, Arc<TokenManager>), SmsError> {
    let pool = connect(&config.database).await?;
    let logs = Arc::new(MySqlSmsLogRepository::new(pool.clone()));
    let templates = Arc::new(MySqlTemplateRepository::new(pool));

    let token_manager = Arc::new(TokenManager::new(config.gateway.clone())?);
    let gateway = Arc::new(HttpSmsGateway::new(
        config.gateway.clone(),
        token_manager.clone(),
    )?);

    let broadcast = Arc::new(BroadcastService::new(gateway, logs, templates.clone()));
    let events = Arc::new(DocumentEventService::new(broadcast.clone(), templates));

    Ok((
        web::Data::new(AppState::new(broadcast, events)),
        token_manager,
    ))
}

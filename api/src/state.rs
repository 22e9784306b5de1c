//! Application state shared by the route handlers

use std::sync::Arc;

use sf_core::repositories::{SmsLogRepository, TemplateRepository};
use sf_core::services::broadcast::BroadcastService;
use sf_core::services::events::DocumentEventService;
use sf_core::services::gateway::SmsGateway;

/// Services injected into the handlers
pub struct AppState<G, L, T>
where
    G: SmsGateway,
    L: SmsLogRepository,
    T: TemplateRepository,
{
    pub broadcast: Arc<BroadcastService<G, L, T>>,
    pub events: Arc<DocumentEventService<G, L, T>>,
}

impl<G, L, T> AppState<G, L, T>
where
    G: SmsGateway,
    L: SmsLogRepository,
    T: TemplateRepository,
{
    pub fn new(
        broadcast: Arc<BroadcastService<G, L, T>>,
        events: Arc<DocumentEventService<G, L, T>>,
    ) -> Self {
        Self { broadcast, events }
    }
}

//! Dispatch services

pub mod broadcast;
pub mod events;
pub mod gateway;

pub use broadcast::{
    BroadcastContent, BroadcastOptions, BroadcastReport, BroadcastService, TemplatePreview,
};
pub use events::{DocumentEvent, DocumentEventService, TemplateFireReport};
pub use gateway::SmsGateway;

//! Domain entities

pub mod sms_log;
pub mod sms_template;

pub use sms_log::{
    BroadcastAggregate, BroadcastStatus, DeliveryStatus, DocumentRef, SmsLogEntry,
};
pub use sms_template::{render_template, SmsTemplate, TriggerEvent};

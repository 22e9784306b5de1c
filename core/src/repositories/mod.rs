//! Repository interfaces over the host platform's storage

pub mod sms_log;
pub mod template;

pub use sms_log::SmsLogRepository;
pub use template::TemplateRepository;

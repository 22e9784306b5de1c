//! # SmsFlow Core
//!
//! Domain layer for the SmsFlow backend. This crate contains the recipient
//! normalizer, template rendering, delivery log entities, repository
//! interfaces, and the broadcast and document-event dispatch services.
//! Network and storage implementations live in `sf_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::{SmsLogRepository, TemplateRepository};
pub use services::*;

//! Value objects shared by the dispatch services

pub mod dispatch;
pub mod recipients;

pub use dispatch::{DispatchOutcome, DispatchRequest, MessageType};
pub use recipients::{normalize_recipients, RecipientInput, RecipientSet};

//! Broadcast dispatch service
//!
//! Orchestrates one send end to end: normalize the recipient input,
//! resolve the message (raw text or a stored template), dispatch through
//! the gateway, write one delivery log row per recipient, and derive the
//! broadcast counters from the log history.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::{
    BroadcastContent, BroadcastOptions, BroadcastReport, BroadcastService, TemplatePreview,
};

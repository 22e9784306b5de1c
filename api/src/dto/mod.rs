//! Request and response shapes for the HTTP surface

pub mod sms;

pub use sms::{
    AggregateQuery, BroadcastSendRequest, CredentialTestRequest, PreviewRequest,
    ResendFailedRequest, SendTestRequest,
};

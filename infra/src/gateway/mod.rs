//! SMS Gateway Module
//!
//! HTTP integration with the upstream SMS gateway:
//!
//! - **Token Manager**: caches the bearer token and refreshes it near expiry
//! - **Dispatch Client**: one batched send per request, with a single
//!   retry when the gateway rejects the token
//! - **Diagnostics**: credential check with masked excerpts, outbound
//!   public IP probe for allow-listing

pub mod client;
pub mod diagnostics;
pub mod token;

// Re-export commonly used types
pub use client::HttpSmsGateway;
pub use diagnostics::{
    probe_outbound_ip, test_credentials, CredentialOverrides, CredentialReport, IpProbeReport,
};
pub use token::{TokenManager, TokenState};

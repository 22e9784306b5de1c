//! Gateway dispatch interface

use async_trait::async_trait;

use crate::domain::value_objects::dispatch::{DispatchOutcome, DispatchRequest};

/// Boundary trait for the upstream SMS gateway
///
/// Implementations must convert every failure - transport errors, auth
/// failures, provider rejections - into a `Failed` outcome instead of
/// returning an error, so batch callers can aggregate uniformly.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send one batched request and classify the result
    async fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome;

    /// Name of the gateway implementation, for logs
    fn provider_name(&self) -> &str;
}

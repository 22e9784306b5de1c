//! Delivery log repository interface

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::sms_log::{DeliveryStatus, DocumentRef, SmsLogEntry};
use crate::errors::SmsResult;

/// Storage for delivery log rows
///
/// Rows are insert-only. `insert_many` must be synchronous enough that a
/// caller re-reading immediately after it returns sees every row.
#[async_trait]
pub trait SmsLogRepository: Send + Sync {
    /// Insert one row per recipient of a dispatch attempt
    async fn insert_many(&self, entries: &[SmsLogEntry]) -> SmsResult<()>;

    /// Latest status per distinct recipient number for a business record
    ///
    /// Scans the record's rows in chronological order so later attempts
    /// overwrite earlier ones.
    async fn latest_status_by_recipient(
        &self,
        reference: &DocumentRef,
    ) -> SmsResult<HashMap<String, DeliveryStatus>>;
}

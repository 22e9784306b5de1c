//! Delivery log repository backed by MySQL
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE sms_log (
//!     id                BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
//!     msisdn            VARCHAR(191) NOT NULL,
//!     message           TEXT NOT NULL,
//!     status            VARCHAR(16) NOT NULL,
//!     response          TEXT NOT NULL,
//!     sent_at           DATETIME(6) NOT NULL,
//!     reference_doctype VARCHAR(191) NULL,
//!     reference_name    VARCHAR(191) NULL,
//!     KEY idx_reference (reference_doctype, reference_name)
//! );
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};
use tracing::error;

use sf_core::domain::entities::sms_log::{DeliveryStatus, DocumentRef, SmsLogEntry};
use sf_core::errors::{SmsError, SmsResult};
use sf_core::repositories::SmsLogRepository;

/// MySQL-backed delivery log
pub struct MySqlSmsLogRepository {
    pool: Pool<MySql>,
}

impl MySqlSmsLogRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

const INSERT_LOG: &str = r#"
    INSERT INTO sms_log (
        msisdn, message, status, response, sent_at,
        reference_doctype, reference_name
    ) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_STATUSES: &str = r#"
    SELECT msisdn, status
    FROM sms_log
    WHERE reference_doctype = ? AND reference_name = ?
    ORDER BY sent_at ASC, id ASC
"#;

#[async_trait]
impl SmsLogRepository for MySqlSmsLogRepository {
    async fn insert_many(&self, entries: &[SmsLogEntry]) -> SmsResult<()> {
        // One transaction so a caller re-reading after return sees all rows
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SmsError::storage(format!("failed to open transaction: {e}")))?;

        for entry in entries {
            sqlx::query(INSERT_LOG)
                .bind(&entry.msisdn)
                .bind(&entry.message)
                .bind(entry.status.as_str())
                .bind(&entry.response)
                .bind(entry.sent_at)
                .bind(entry.reference.as_ref().map(|r| r.doctype.as_str()))
                .bind(entry.reference.as_ref().map(|r| r.name.as_str()))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!(error = %e, "failed to insert delivery log row");
                    SmsError::storage(format!("failed to insert delivery log row: {e}"))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| SmsError::storage(format!("failed to commit delivery log rows: {e}")))
    }

    async fn latest_status_by_recipient(
        &self,
        reference: &DocumentRef,
    ) -> SmsResult<HashMap<String, DeliveryStatus>> {
        let rows = sqlx::query(SELECT_STATUSES)
            .bind(&reference.doctype)
            .bind(&reference.name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SmsError::storage(format!("failed to read delivery logs: {e}")))?;

        // Rows come back oldest first, so later attempts overwrite earlier
        let mut latest = HashMap::new();
        for row in rows {
            let msisdn: String = row.get("msisdn");
            let status: String = row.get("status");
            if msisdn.trim().is_empty() {
                continue;
            }
            latest.insert(msisdn, DeliveryStatus::parse(&status));
        }
        Ok(latest)
    }
}

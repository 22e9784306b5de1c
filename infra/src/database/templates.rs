//! Template repository backed by MySQL
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE sms_template (
//!     name               VARCHAR(191) PRIMARY KEY,
//!     body               TEXT NOT NULL,
//!     enabled            TINYINT(1) NOT NULL DEFAULT 1,
//!     document_type      VARCHAR(191) NOT NULL,
//!     trigger_event      VARCHAR(32) NOT NULL,
//!     value_change_field VARCHAR(191) NULL,
//!     phone_field        VARCHAR(191) NULL,
//!     static_recipients  TEXT NULL,
//!     message_type       VARCHAR(16) NOT NULL DEFAULT 'Transactional',
//!     dlr_url            VARCHAR(2048) NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};
use tracing::warn;

use sf_core::domain::entities::sms_template::{SmsTemplate, TriggerEvent};
use sf_core::domain::value_objects::dispatch::MessageType;
use sf_core::errors::{SmsError, SmsResult};
use sf_core::repositories::TemplateRepository;

/// MySQL-backed template catalogue
pub struct MySqlTemplateRepository {
    pool: Pool<MySql>,
}

impl MySqlTemplateRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

const SELECT_FIELDS: &str = r#"
    SELECT name, body, enabled, document_type, trigger_event,
           value_change_field, phone_field, static_recipients,
           message_type, dlr_url
    FROM sms_template
"#;

// Rows with an unrecognized trigger are skipped rather than failing the
// whole lookup; a broken template must not block the others.
fn map_row(row: &MySqlRow) -> Option<SmsTemplate> {
    let name: String = row.get("name");
    let trigger_raw: String = row.get("trigger_event");
    let Some(trigger_event) = TriggerEvent::parse(&trigger_raw) else {
        warn!(template = %name, trigger = %trigger_raw, "unknown trigger event, skipping");
        return None;
    };
    let message_type_raw: String = row.get("message_type");

    Some(SmsTemplate {
        name,
        body: row.get("body"),
        enabled: row.get::<bool, _>("enabled"),
        document_type: row.get("document_type"),
        trigger_event,
        value_change_field: row.get("value_change_field"),
        phone_field: row.get("phone_field"),
        static_recipients: row.get("static_recipients"),
        message_type: MessageType::parse(&message_type_raw),
        dlr_url: row.get("dlr_url"),
    })
}

#[async_trait]
impl TemplateRepository for MySqlTemplateRepository {
    async fn find_by_name(&self, name: &str) -> SmsResult<Option<SmsTemplate>> {
        let query = format!("{SELECT_FIELDS} WHERE name = ?");
        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SmsError::storage(format!("failed to read template: {e}")))?;

        Ok(row.as_ref().and_then(map_row))
    }

    async fn find_enabled_for_doctype(&self, doctype: &str) -> SmsResult<Vec<SmsTemplate>> {
        let query = format!("{SELECT_FIELDS} WHERE enabled = 1 AND document_type = ?");
        let rows = sqlx::query(&query)
            .bind(doctype)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SmsError::storage(format!("failed to list templates: {e}")))?;

        Ok(rows.iter().filter_map(map_row).collect())
    }
}

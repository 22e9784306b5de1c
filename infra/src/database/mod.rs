//! Database module
//!
//! MySQL repositories over the host platform's database, implemented
//! with SQLx. The crate does not own the schema; the host platform
//! provisions the `sms_log` and `sms_template` tables.

pub mod sms_log;
pub mod templates;

pub use sms_log::MySqlSmsLogRepository;
pub use templates::MySqlTemplateRepository;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};

use sf_core::errors::{SmsError, SmsResult};
use sf_shared::config::DatabaseConfig;

/// Connect a MySQL pool using the shared database configuration
pub async fn connect(config: &DatabaseConfig) -> SmsResult<Pool<MySql>> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| SmsError::storage(format!("failed to connect to the database: {e}")))
}

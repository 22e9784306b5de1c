//! Template repository interface

use async_trait::async_trait;

use crate::domain::entities::sms_template::SmsTemplate;
use crate::errors::SmsResult;

/// Storage for SMS templates owned by the host platform
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Look up a template by its unique name
    async fn find_by_name(&self, name: &str) -> SmsResult<Option<SmsTemplate>>;

    /// All enabled templates listening to a document type
    async fn find_enabled_for_doctype(&self, doctype: &str) -> SmsResult<Vec<SmsTemplate>>;
}

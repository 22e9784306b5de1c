//! Stored SMS templates, placeholder rendering, and document-event triggers.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_objects::dispatch::MessageType;

// {{identifier}} with optional inner whitespace
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Document event a template can be triggered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    OnSubmit,
    OnUpdateAfterSubmit,
    OnCancel,
    /// Fires on any update event where the configured field changed
    ValueChange,
}

impl TriggerEvent {
    /// Storage representation, matching the host platform's event names
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerEvent::OnSubmit => "on_submit",
            TriggerEvent::OnUpdateAfterSubmit => "on_update_after_submit",
            TriggerEvent::OnCancel => "on_cancel",
            TriggerEvent::ValueChange => "value_change",
        }
    }

    /// Parse the storage representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "on_submit" => Some(TriggerEvent::OnSubmit),
            "on_update_after_submit" => Some(TriggerEvent::OnUpdateAfterSubmit),
            "on_cancel" => Some(TriggerEvent::OnCancel),
            "value_change" => Some(TriggerEvent::ValueChange),
            _ => None,
        }
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored message template owned by the host platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsTemplate {
    /// Unique template name
    pub name: String,
    /// Message body with `{{placeholder}}` markers
    pub body: String,
    /// Disabled templates never fire and cannot be sent from
    pub enabled: bool,
    /// Document type the template listens to
    pub document_type: String,
    /// Event that fires the template
    pub trigger_event: TriggerEvent,
    /// Field compared between old and new values for `ValueChange`
    pub value_change_field: Option<String>,
    /// Document field holding the recipient number(s)
    pub phone_field: Option<String>,
    /// Additional fixed recipients, comma/semicolon/newline separated
    pub static_recipients: Option<String>,
    /// Message class forwarded to the gateway
    pub message_type: MessageType,
    /// Delivery receipt callback URL forwarded to the gateway
    pub dlr_url: Option<String>,
}

impl SmsTemplate {
    /// Whether this template fires for a document event
    ///
    /// `event` is the host platform's event name. `ValueChange` templates
    /// match any event where the configured field differs between the
    /// previous and current values; without previous values they never fire.
    pub fn matches_event(
        &self,
        event: &str,
        values: &Map<String, Value>,
        previous: Option<&Map<String, Value>>,
    ) -> bool {
        if self.trigger_event.as_str() == event {
            return true;
        }
        if self.trigger_event == TriggerEvent::ValueChange {
            if let (Some(field), Some(previous)) = (&self.value_change_field, previous) {
                return previous.get(field) != values.get(field);
            }
        }
        false
    }
}

/// Substitute `{{identifier}}` placeholders in a template body
///
/// A placeholder is replaced when its key exists in `values` and is not
/// null, and left verbatim otherwise. Returns the rendered body plus the
/// sorted, deduplicated list of keys left unresolved.
pub fn render_template(body: &str, values: &Map<String, Value>) -> (String, Vec<String>) {
    let mut missing = BTreeSet::new();

    let rendered = PLACEHOLDER_REGEX.replace_all(body, |caps: &Captures| {
        let key = &caps[1];
        match values.get(key) {
            Some(value) if !value.is_null() => value_to_string(value),
            _ => {
                missing.insert(key.to_string());
                caps[0].to_string()
            }
        }
    });

    (rendered.into_owned(), missing.into_iter().collect())
}

// Strings render bare; other JSON values use their compact form
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_reports_missing_keys() {
        let vals = values(&[("name", json!("Amina"))]);
        let (rendered, missing) = render_template("Hi {{name}}, code {{code}}", &vals);
        assert_eq!(rendered, "Hi Amina, code {{code}}");
        assert_eq!(missing, vec!["code".to_string()]);
    }

    #[test]
    fn test_render_accepts_inner_whitespace() {
        let vals = values(&[("amount", json!(1250))]);
        let (rendered, missing) = render_template("Paid {{ amount }} KES", &vals);
        assert_eq!(rendered, "Paid 1250 KES");
        assert!(missing.is_empty());
    }

    #[test]
    fn test_render_null_counts_as_missing() {
        let vals = values(&[("code", Value::Null)]);
        let (rendered, missing) = render_template("Code: {{code}}", &vals);
        assert_eq!(rendered, "Code: {{code}}");
        assert_eq!(missing, vec!["code".to_string()]);
    }

    #[test]
    fn test_render_missing_keys_sorted_and_deduplicated() {
        let (_, missing) = render_template("{{b}} {{a}} {{b}}", &Map::new());
        assert_eq!(missing, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_render_leaves_malformed_placeholders_alone() {
        let vals = values(&[("name", json!("Amina"))]);
        let (rendered, missing) = render_template("{{1bad}} {name} {{name}}", &vals);
        assert_eq!(rendered, "{{1bad}} {name} Amina");
        assert!(missing.is_empty());
    }

    fn template(trigger: TriggerEvent, value_change_field: Option<&str>) -> SmsTemplate {
        SmsTemplate {
            name: "order-update".to_string(),
            body: "Order {{order_no}} updated".to_string(),
            enabled: true,
            document_type: "Sales Order".to_string(),
            trigger_event: trigger,
            value_change_field: value_change_field.map(str::to_string),
            phone_field: Some("customer_phone".to_string()),
            static_recipients: None,
            message_type: MessageType::Transactional,
            dlr_url: None,
        }
    }

    #[test]
    fn test_matches_exact_event() {
        let t = template(TriggerEvent::OnSubmit, None);
        assert!(t.matches_event("on_submit", &Map::new(), None));
        assert!(!t.matches_event("on_cancel", &Map::new(), None));
    }

    #[test]
    fn test_value_change_requires_previous_values() {
        let t = template(TriggerEvent::ValueChange, Some("status"));
        let new_vals = values(&[("status", json!("Delivered"))]);
        let old_vals = values(&[("status", json!("In Transit"))]);

        assert!(t.matches_event("on_update_after_submit", &new_vals, Some(&old_vals)));
        assert!(!t.matches_event("on_update_after_submit", &new_vals, Some(&new_vals)));
        assert!(!t.matches_event("on_update_after_submit", &new_vals, None));
    }
}

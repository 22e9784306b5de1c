//! Recipient number normalization.
//!
//! Callers hand over recipients in whatever shape their integration
//! produces: a single number, a list, a comma/semicolon/newline separated
//! string, or a serialized JSON list pasted into a text field. All of it
//! is flattened into a deduplicated list of gateway-ready MSISDNs, with
//! rejected and duplicate entries kept for diagnostics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use sf_shared::utils::phone::{is_valid_msisdn, strip_formatting};

/// Raw recipient input accepted from callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipientInput {
    /// A single number or a delimited/serialized list in one string
    Text(String),
    /// An explicit list of entries
    List(Vec<String>),
}

impl RecipientInput {
    /// Raw form for diagnostics, e.g. the log row written when nothing validates
    pub fn raw_display(&self) -> String {
        match self {
            RecipientInput::Text(text) => text.clone(),
            RecipientInput::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for RecipientInput {
    fn from(value: &str) -> Self {
        RecipientInput::Text(value.to_string())
    }
}

impl From<Vec<String>> for RecipientInput {
    fn from(value: Vec<String>) -> Self {
        RecipientInput::List(value)
    }
}

/// Result of normalizing recipient input
///
/// `valid` keeps first-occurrence order and contains no duplicates.
/// `invalid` and `duplicates` are deduplicated for reporting, while
/// `entered_count` counts every non-blank entry as seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientSet {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
    pub duplicates: Vec<String>,
    pub entered_count: usize,
}

impl RecipientSet {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}

/// Normalize recipient input into a validated, deduplicated set
///
/// Never fails: empty input yields an all-empty set, and malformed
/// entries land in `invalid` instead of aborting the batch.
pub fn normalize_recipients(input: &RecipientInput) -> RecipientSet {
    let raw = match input {
        RecipientInput::Text(text) => flatten_text(text),
        RecipientInput::List(items) => items.clone(),
    };

    let mut set = RecipientSet::default();
    let mut accepted = HashSet::new();
    let mut reported_invalid = HashSet::new();
    let mut reported_duplicates = HashSet::new();

    for entry in &raw {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        set.entered_count += 1;

        let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let normalized = strip_formatting(without_plus);

        if !is_valid_msisdn(&normalized) {
            if reported_invalid.insert(trimmed.to_string()) {
                set.invalid.push(trimmed.to_string());
            }
            continue;
        }

        if !accepted.insert(normalized.clone()) {
            if reported_duplicates.insert(normalized.clone()) {
                set.duplicates.push(normalized);
            }
            continue;
        }

        set.valid.push(normalized);
    }

    set
}

// A string that looks like serialized JSON is parsed as such; anything
// else (including JSON that is not an array) splits on , ; and newlines.
fn flatten_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(trimmed) {
            return items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
        }
    }

    trimmed
        .split(|c| matches!(c, ',' | ';' | '\n'))
        .map(str::to_string)
        .collect()
}

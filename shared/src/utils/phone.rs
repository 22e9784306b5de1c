//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// MSISDN shape accepted by the gateway: international digits, no leading +
static MSISDN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8,15}$").unwrap());

/// Remove formatting characters commonly pasted along with numbers
///
/// Strips spaces, dashes, dots and parentheses. Anything else is kept so
/// that genuinely malformed entries still fail validation.
pub fn strip_formatting(entry: &str) -> String {
    entry
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Check whether a normalized entry is a valid MSISDN (8-15 digits)
pub fn is_valid_msisdn(entry: &str) -> bool {
    MSISDN_REGEX.is_match(entry)
}

/// Mask an MSISDN for logs, keeping the prefix and the last four digits
pub fn mask_msisdn(msisdn: &str) -> String {
    if msisdn.len() >= 7 {
        format!("{}****{}", &msisdn[0..3], &msisdn[msisdn.len() - 4..])
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("254 712-345.678"), "254712345678");
        assert_eq!(strip_formatting("(254)712345678"), "254712345678");
        assert_eq!(strip_formatting("0712345678abc"), "0712345678abc");
    }

    #[test]
    fn test_is_valid_msisdn() {
        assert!(is_valid_msisdn("254712345678"));
        assert!(is_valid_msisdn("12345678")); // 8 digits, lower bound
        assert!(is_valid_msisdn("123456789012345")); // 15 digits, upper bound
        assert!(!is_valid_msisdn("1234567")); // too short
        assert!(!is_valid_msisdn("1234567890123456")); // too long
        assert!(!is_valid_msisdn("0712345678abc")); // letters
        assert!(!is_valid_msisdn("+254712345678")); // leading plus not stripped
        assert!(!is_valid_msisdn(""));
    }

    #[test]
    fn test_mask_msisdn() {
        assert_eq!(mask_msisdn("254712345678"), "254****5678");
        assert_eq!(mask_msisdn("12345"), "****");
    }
}

//! Error taxonomy for SMS dispatch and logging.

use thiserror::Error;

/// Convenience alias used across the dispatch services
pub type SmsResult<T> = Result<T, SmsError>;

/// Errors surfaced by the SmsFlow services
///
/// Dispatch-level failures (transport, rejection) are converted into a
/// `Failed` outcome by the gateway client so batch callers can aggregate;
/// these variants reach callers only from paths that must not swallow
/// failures, such as token refresh and storage.
#[derive(Error, Debug)]
pub enum SmsError {
    /// Missing or malformed caller input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Login rejected by the gateway or no token in its response
    #[error("Gateway authentication failed: {message}")]
    Auth { message: String },

    /// Network-level failure talking to the gateway
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The gateway answered with a non-success status
    #[error("Gateway rejected the request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Host platform storage failure
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Incomplete or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SmsError {
    /// Build a validation error from any displayable message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Build a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Build a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SmsError::validation("message is required");
        assert_eq!(err.to_string(), "Validation error: message is required");

        let err = SmsError::Rejected {
            status: 500,
            body: "upstream down".to_string(),
        };
        assert!(err.to_string().contains("HTTP 500"));
        assert!(err.to_string().contains("upstream down"));
    }
}

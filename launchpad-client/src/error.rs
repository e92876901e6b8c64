//! Error types for the task API client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (refused, timed out, bad URL)
    #[error("request to task API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status; `message` is the envelope's `error`
    #[error("task API answered {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status of an API error, `None` when no response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Transport failures and 5xx answers may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> ClientError {
        ClientError::Api {
            status,
            message: "x".into(),
        }
    }

    #[test]
    fn test_status_and_retryability() {
        assert!(api(404).is_not_found());
        assert!(!api(404).is_retryable());
        assert!(api(503).is_retryable());
        assert_eq!(ClientError::Decode("eof".into()).status(), None);
        assert!(!ClientError::Decode("eof".into()).is_retryable());
    }
}

//! Tracker error types

use thiserror::Error;

/// Errors that can occur while calling the CTA tracker APIs
///
/// Errors reported by the CTA service inside a successful HTTP response
/// (unknown stop id, daily quota exceeded, ...) are not represented here.
/// They are returned as data by the typed trackers, see
/// [`BusResponse`](crate::BusResponse) and [`TrainResponse`](crate::TrainResponse).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A required parameter is missing or malformed; no request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection to the tracker service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The service answered with a non-success HTTP status
    #[error("Request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// The response body is not valid JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// The JSON does not match the declared response schema
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TrackerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns true if the error came from the HTTP round trip itself
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::RequestFailed { .. }
        )
    }

    /// Returns true if repeating the same call may succeed
    ///
    /// The library never retries on its own; this is a hint for callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::RequestFailed { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(TrackerError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(TrackerError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(TrackerError::RequestFailed { status: 503 }.is_retryable());
        assert!(TrackerError::RequestFailed { status: 429 }.is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!TrackerError::RequestFailed { status: 404 }.is_retryable());
        assert!(!TrackerError::InvalidArgument("test".to_string()).is_retryable());
        assert!(!TrackerError::Decode("test".to_string()).is_retryable());
        assert!(!TrackerError::Validation("test".to_string()).is_retryable());
        assert!(!TrackerError::Configuration("test".to_string()).is_retryable());
    }

    #[test]
    fn test_transport_classification() {
        assert!(TrackerError::RequestFailed { status: 500 }.is_transport());
        assert!(TrackerError::Timeout { timeout_secs: 1 }.is_transport());
        assert!(!TrackerError::Decode("bad".to_string()).is_transport());
        assert!(!TrackerError::Validation("bad".to_string()).is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = TrackerError::RequestFailed { status: 502 };
        assert!(err.to_string().contains("502"));

        let err = TrackerError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));

        let err = TrackerError::invalid("stpid is required");
        assert_eq!(err.to_string(), "Invalid argument: stpid is required");
    }
}

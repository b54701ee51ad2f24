//! Video service error types

use thiserror::Error;

use crate::ratelimit::RATE_LIMIT_STATUS;

/// Result type alias for video service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by a video service client.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport-level failure: connect, TLS, timeout, body read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform's anti-automation layer rejected the request.
    #[error("Rate limited by the platform (status {status})")]
    RateLimited { status: u16 },

    /// Non-success HTTP status outside the rate-limit signal.
    #[error("Platform returned HTTP {status}")]
    Http { status: u16 },

    /// The API envelope carried an error code.
    #[error("Platform API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The platform rejected the supplied credential.
    #[error("Credential rejected: {message}")]
    InvalidCredential { message: String },

    /// The response decoded but did not have the expected shape.
    #[error("Unexpected platform response: {message}")]
    UnexpectedResponse { message: String },
}

impl ServiceError {
    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16) -> Self {
        if status == RATE_LIMIT_STATUS {
            Self::RateLimited { status }
        } else {
            Self::Http { status }
        }
    }

    /// Create an API envelope error.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Create an invalid credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    /// Create an unexpected response error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// Whether this is the platform's rate-limit rejection.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Whether the platform rejected the supplied credential.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, Self::InvalidCredential { .. })
    }

    /// HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status } | Self::Http { status } => Some(*status),
            Self::Transport(source) => source.status().map(|code| code.as_u16()),
            Self::Api { .. } | Self::InvalidCredential { .. } | Self::UnexpectedResponse { .. } => {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_precondition_failed_to_rate_limited() {
        let error = ServiceError::from_status(412);

        assert!(error.is_rate_limit());
        assert_eq!(error.status(), Some(412));
    }

    #[test]
    fn test_from_status_keeps_other_statuses_plain() {
        let error = ServiceError::from_status(503);

        assert!(!error.is_rate_limit());
        assert!(matches!(error, ServiceError::Http { status: 503 }));
    }

    #[test]
    fn test_api_error_carries_code_and_message() {
        let error = ServiceError::api(-400, "bad request");

        assert_eq!(error.status(), None);
        assert!(error.to_string().contains("-400"));
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn test_invalid_credential_display() {
        let error = ServiceError::invalid_credential("account not logged in");

        assert!(error.to_string().contains("Credential rejected"));
        assert!(!error.is_rate_limit());
    }

    #[test]
    fn test_credential_rejection_classification() {
        assert!(ServiceError::invalid_credential("expired").is_credential_rejection());
        assert!(!ServiceError::from_status(412).is_credential_rejection());
        assert!(!ServiceError::api(-400, "bad request").is_credential_rejection());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ServiceError>();
        assert_sync::<ServiceError>();
    }
}

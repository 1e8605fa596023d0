//! Error types for SIEG authentication operations

/// Errors from SIEG authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument or option was blank. Raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed or the provider answered with a non-2xx status.
    /// `status` is 0 when no response was received.
    #[error("HTTP request failed (status {status}): {message}")]
    Http {
        status: u16,
        body: Option<String>,
        message: String,
    },

    /// The provider answered but reported failure or omitted the payload.
    #[error("{message} StatusCode={status_code}, Error='{provider_message}'.")]
    Provider {
        message: String,
        status_code: i64,
        provider_message: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Failure reported by a `TokenStore` backend.
    #[error("token store error: {0}")]
    Store(String),

    #[error(transparent)]
    Config(#[from] common::Error),
}

impl From<common::BlankError> for Error {
    fn from(err: common::BlankError) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}

impl Error {
    /// Provider-reported status code, if this is a provider or HTTP failure.
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Error::Provider { status_code, .. } => Some(*status_code),
            Error::Http { status, .. } => Some(i64::from(*status)),
            _ => None,
        }
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_embeds_status_and_message() {
        let err = Error::Provider {
            message: "failed to generate durable token.".into(),
            status_code: 400,
            provider_message: "bad".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to generate durable token. StatusCode=400, Error='bad'."
        );
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn http_error_without_response_reports_zero() {
        let err = Error::Http {
            status: 0,
            body: None,
            message: "connection refused".into(),
        };
        assert!(err.to_string().contains("status 0"));
        assert_eq!(err.status_code(), Some(0));
    }

    #[test]
    fn blank_value_maps_to_invalid_argument() {
        let err: Error = common::require_non_blank("account_key", " ")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(err.to_string(), "invalid argument: account_key must not be blank");
    }

    #[test]
    fn config_error_is_transparent() {
        let err: Error = common::Error::Config("client_id must not be blank".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: client_id must not be blank"
        );
        assert_eq!(err.status_code(), None);
    }
}

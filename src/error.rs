//! Error types for the outbound clients (sensor feed, log API, webhook).
//!
//! Startup and glue code uses `anyhow`; anything that talks to a remote
//! service returns [`ClientError`] so the caller can log the precise cause
//! and carry on.

/// Failure talking to one of the external services.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure: connect, TLS, timeout, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The body arrived but was not the shape we expected.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// `true` for failures that may go away on their own (transport errors
    /// and 5xx responses).
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            ClientError::Decode(_) => false,
        }
    }
}

/// Turn a non-2xx response into [`ClientError::Status`].
pub(crate) fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status {
            url: resp.url().to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            url: "http://logs.local/api/showLogs".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "http://logs.local/api/showLogs returned status 503"
        );
    }

    #[test]
    fn test_transient_classification() {
        let server = ClientError::Status {
            url: "u".into(),
            status: 502,
        };
        let client = ClientError::Status {
            url: "u".into(),
            status: 404,
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
        assert!(!ClientError::Decode("bad".into()).is_transient());
    }
}

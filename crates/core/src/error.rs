//! Centralized error types for the Pointage workspace.

use thiserror::Error;

/// A failed HTTP response, distilled to what the caller can act on.
///
/// Built by the gateway's fault interpreter from a non-2xx response:
/// `message` comes from the body's `message` or `error` field, falling back
/// to `Request failed with status: <code>` when the body is not JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 403 means the session is invalid; everything else is surfaced as-is.
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }
}

/// Top-level error enum. Variants map to failure layers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a usable response (DNS, TLS, refused, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 2xx body that failed to decode into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Status code of the underlying API failure, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_message_only() {
        let e = ApiError::new(400, "Invalid username or password");
        assert_eq!(e.to_string(), "Invalid username or password");
    }

    #[test]
    fn client_error_exposes_status() {
        let e = ClientError::from(ApiError::new(403, "Invalid token"));
        assert_eq!(e.status(), Some(403));
        assert!(ClientError::Transport("refused".into()).status().is_none());
    }
}

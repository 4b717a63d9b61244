use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Coarse classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Rejected locally, no request was sent.
    InvalidRequest,
    /// Connection, DNS, timeout or an error while sending/receiving.
    Transport,
    /// The storage service answered with a non-2xx status.
    RemoteError,
    /// The payload could not be turned into the requested object.
    DecodeError,
    Cancelled,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage returned error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::InvalidRequest(_) => FailureKind::InvalidRequest,
            FetchError::Transport(_) => FailureKind::Transport,
            FetchError::Remote { .. } => FailureKind::RemoteError,
            FetchError::Decode(_) => FailureKind::DecodeError,
            FetchError::Cancelled => FailureKind::Cancelled,
        }
    }

    /// HTTP status of a [`FetchError::Remote`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FetchError::Remote { status: 404, .. } | FetchError::Decode(DecodeError::NotFound(_))
        )
    }
}

/// Raised by decoder collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Payload is not a valid {expected}: {reason}")]
    InvalidPayload {
        expected: &'static str,
        reason: String,
    },

    #[error("Asset not found in bundle: {0}")]
    NotFound(String),
}

impl DecodeError {
    pub fn invalid(expected: &'static str, reason: impl ToString) -> Self {
        DecodeError::InvalidPayload {
            expected,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_keeps_status_and_body() {
        let err = FetchError::Remote {
            status: 403,
            body: "forbidden".into(),
        };
        assert_eq!(err.kind(), FailureKind::RemoteError);
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "Storage returned error 403: forbidden");
    }

    #[test]
    fn decode_errors_convert_into_fetch_errors() {
        let err: FetchError = DecodeError::NotFound("hero".into()).into();
        assert_eq!(err.kind(), FailureKind::DecodeError);
        assert!(err.is_not_found());
        assert_eq!(err.status(), None);
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QaError>;

/// Failures surfaced by the upload and question-answering services.
#[derive(Debug, Error)]
pub enum QaError {
    /// The caller sent something unusable (no file, no question, bad session id)
    #[error("{0}")]
    Input(String),

    /// Nothing has been extracted for the requested slot yet
    #[error("{0}")]
    NotFound(String),

    /// PDF extraction or the completion service failed
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Filesystem failure while reading or replacing a slot
    #[error("{0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for QaError {
    fn from(err: std::io::Error) -> Self {
        QaError::Storage(err.to_string())
    }
}

impl QaError {
    /// True for errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QaError::Input(_) | QaError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_storage_errors_with_their_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only filesystem");
        let err = QaError::from(io);

        assert!(matches!(err, QaError::Storage(_)));
        assert_eq!(err.to_string(), "read-only filesystem");
        assert!(!err.is_client_error());
    }

    #[test]
    fn storage_errors_can_carry_a_plain_message() {
        let err = QaError::Storage("write task aborted".into());
        assert_eq!(err.to_string(), "write task aborted");
    }
}

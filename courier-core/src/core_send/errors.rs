//! Error types for the send pipeline

use super::transport::TransportError;
use crate::core_attachment::AttachmentError;
use crate::core_crypto::CertificateError;
use crate::core_discovery::DiscoveryError;
use thiserror::Error;

/// Result type for send operations
pub type SendResult<T> = Result<T, SendError>;

/// The single error taxonomy surfaced by the terminal send operation
///
/// Failures already typed as one of the pipeline's own kinds pass through
/// unchanged; anything unexpected is wrapped into [`SendError::Wrapped`].
#[derive(Debug, Error)]
pub enum SendError {
    /// A required field was missing at a validation gate
    #[error("Builder configuration incomplete: {0}")]
    Configuration(String),

    /// Endpoint discovery failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The resolved receiver certificate is unusable
    #[error("Receiver certificate unusable: {0}")]
    Certificate(#[from] CertificateError),

    /// The transport collaborator failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Any unexpected failure, wrapped so callers observe one taxonomy
    #[error("Wrapped send failure: {0}")]
    Wrapped(anyhow::Error),
}

impl SendError {
    /// Wrap an unexpected failure
    pub fn wrapped(err: impl Into<anyhow::Error>) -> Self {
        SendError::Wrapped(err.into())
    }

    /// Metric label for the failure class
    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            SendError::Configuration(_) => "configuration",
            SendError::Discovery(_) => "discovery",
            SendError::Certificate(_) => "certificate",
            SendError::Transport(_) => "transport",
            SendError::Wrapped(_) => "wrapped",
        }
    }
}

impl From<AttachmentError> for SendError {
    fn from(err: AttachmentError) -> Self {
        SendError::wrapped(err)
    }
}

impl From<std::io::Error> for SendError {
    fn from(err: std::io::Error) -> Self {
        SendError::wrapped(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_passes_through_transparently() {
        let err: SendError = TransportError::Timeout.into();
        assert_eq!(err.to_string(), TransportError::Timeout.to_string());
        assert!(matches!(err, SendError::Transport(_)));
    }

    #[test]
    fn test_unexpected_errors_are_wrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: SendError = io.into();
        assert!(matches!(err, SendError::Wrapped(_)));
        assert!(err.to_string().starts_with("Wrapped send failure"));
    }
}

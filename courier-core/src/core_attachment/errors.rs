//! Error types for attachment handling

use thiserror::Error;

/// Errors raised while building or packaging attachments
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The builder was finalized without a content source
    #[error("Attachment has no content source")]
    MissingSource,

    /// The builder was finalized without a media type
    #[error("Attachment has no media type")]
    MissingMimeType,

    /// Reading the source or spilling to a temporary file failed
    #[error("Attachment I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

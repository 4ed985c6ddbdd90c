//! Outgoing attachment descriptor
//!
//! Built once via the builder, never mutated afterwards. The send pipeline
//! only reads the content source for the duration of one send; ownership of
//! file-backed sources stays with the caller.

use super::errors::AttachmentError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Where the attachment content comes from
///
/// Both variants are re-openable: the transport layer may need to read the
/// content more than once when it retries.
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    /// In-memory content
    Bytes(Vec<u8>),
    /// Content read from a file on each open
    File(PathBuf),
}

impl AttachmentSource {
    /// Open a fresh reader over the content
    pub fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match self {
            AttachmentSource::Bytes(bytes) => Ok(Box::new(bytes.as_slice())),
            AttachmentSource::File(path) => Ok(Box::new(File::open(path)?)),
        }
    }
}

/// Compression applied to the part at wire serialization time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionMode {
    #[default]
    None,
    /// ebMS3 payload compression (application/gzip)
    Gzip,
}

impl CompressionMode {
    /// The media type advertised for the compressed part, if any
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            CompressionMode::None => None,
            CompressionMode::Gzip => Some("application/gzip"),
        }
    }
}

/// Immutable descriptor of a payload carried as a MIME part
#[derive(Debug, Clone)]
pub struct OutgoingAttachment {
    source: AttachmentSource,
    mime_type: String,
    filename: Option<String>,
    charset: Option<String>,
    content_id: Option<String>,
    compression: CompressionMode,
}

impl OutgoingAttachment {
    /// Start building an attachment
    pub fn builder() -> OutgoingAttachmentBuilder {
        OutgoingAttachmentBuilder::default()
    }

    pub fn source(&self) -> &AttachmentSource {
        &self.source
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    pub fn compression(&self) -> CompressionMode {
        self.compression
    }
}

/// Builder for [`OutgoingAttachment`]
#[derive(Debug, Default)]
pub struct OutgoingAttachmentBuilder {
    source: Option<AttachmentSource>,
    mime_type: Option<String>,
    filename: Option<String>,
    charset: Option<String>,
    content_id: Option<String>,
    compression: CompressionMode,
}

impl OutgoingAttachmentBuilder {
    /// Use in-memory content
    pub fn data(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.source = Some(AttachmentSource::Bytes(bytes.into()));
        self
    }

    /// Use file-backed content, re-read from disk on each open
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(AttachmentSource::File(path.into()));
        self
    }

    /// Media type of the content (required)
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Filename advertised in the part headers
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Character set of textual content
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Explicit content id; generated during packaging when absent
    pub fn content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Compression applied at wire serialization time
    pub fn compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    /// Finalize the descriptor
    pub fn build(self) -> Result<OutgoingAttachment, AttachmentError> {
        let source = self.source.ok_or(AttachmentError::MissingSource)?;
        let mime_type = self.mime_type.ok_or(AttachmentError::MissingMimeType)?;
        Ok(OutgoingAttachment {
            source,
            mime_type,
            filename: self.filename,
            charset: self.charset,
            content_id: self.content_id,
            compression: self.compression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_builder_requires_source() {
        let result = OutgoingAttachment::builder().mime_type("application/xml").build();
        assert!(matches!(result, Err(AttachmentError::MissingSource)));
    }

    #[test]
    fn test_builder_requires_mime_type() {
        let result = OutgoingAttachment::builder().data(b"<Invoice/>".to_vec()).build();
        assert!(matches!(result, Err(AttachmentError::MissingMimeType)));
    }

    #[test]
    fn test_bytes_source_is_re_openable() {
        let attachment = OutgoingAttachment::builder()
            .data(b"payload".to_vec())
            .mime_type("application/xml")
            .build()
            .unwrap();

        for _ in 0..2 {
            let mut content = Vec::new();
            attachment.source().open().unwrap().read_to_end(&mut content).unwrap();
            assert_eq!(content, b"payload");
        }
    }

    #[test]
    fn test_file_source_is_re_openable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"from disk").unwrap();

        let attachment = OutgoingAttachment::builder()
            .file(file.path())
            .mime_type("text/plain")
            .charset("utf-8")
            .build()
            .unwrap();

        for _ in 0..2 {
            let mut content = Vec::new();
            attachment.source().open().unwrap().read_to_end(&mut content).unwrap();
            assert_eq!(content, b"from disk");
        }
    }

    #[test]
    fn test_compression_mime_type() {
        assert_eq!(CompressionMode::Gzip.mime_type(), Some("application/gzip"));
        assert_eq!(CompressionMode::None.mime_type(), None);
    }
}

//! Transport-ready attachment parts
//!
//! Packaging materializes an [`OutgoingAttachment`] immediately before the
//! transport call: byte sources are spilled through the [`ResourceScope`],
//! file sources are referenced in place (already re-readable). Packaging
//! order is owned by the send pipeline: primary payload first, auxiliary
//! attachments in insertion order.

use super::errors::AttachmentError;
use super::outgoing::{AttachmentSource, CompressionMode, OutgoingAttachment};
use super::resource::ResourceScope;
use crate::metrics;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A MIME part ready to be handed to the transport collaborator
#[derive(Debug, Clone, serde::Serialize)]
pub struct PackagedPart {
    content_path: PathBuf,
    mime_type: String,
    content_id: String,
    filename: Option<String>,
    charset: Option<String>,
    compression: CompressionMode,
}

impl PackagedPart {
    /// Materialize an attachment through the given resource scope
    pub fn package(
        attachment: &OutgoingAttachment,
        scope: &mut ResourceScope,
    ) -> Result<Self, AttachmentError> {
        let content_path = match attachment.source() {
            AttachmentSource::Bytes(_) => {
                let mut reader = attachment.source().open()?;
                scope.spill(&mut *reader)?
            }
            AttachmentSource::File(path) => path.clone(),
        };

        let size = std::fs::metadata(&content_path)?.len() as usize;
        metrics::attachment_packaged(size);

        let content_id = attachment
            .content_id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}@courier", Uuid::new_v4()));

        Ok(Self {
            content_path,
            mime_type: attachment.mime_type().to_string(),
            content_id,
            filename: attachment.filename().map(str::to_string),
            charset: attachment.charset().map(str::to_string),
            compression: attachment.compression(),
        })
    }

    /// Re-open the part content; valid until the owning scope closes
    pub fn open(&self) -> io::Result<File> {
        File::open(&self.content_path)
    }

    /// Read the full part content
    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.open()?.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Hex-encoded SHA-256 digest of the part content, for dumps and logs
    pub fn sha256_hex(&self) -> io::Result<String> {
        let mut hasher = Sha256::new();
        io::copy(&mut self.open()?, &mut hasher)?;
        Ok(hex::encode(hasher.finalize()))
    }

    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn compression(&self) -> CompressionMode {
        self.compression
    }
}

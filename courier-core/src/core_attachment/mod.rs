//! Outgoing attachments and scoped temporary resources
//!
//! A business document and its auxiliary files travel as MIME attachment
//! parts. This module provides:
//! - [`OutgoingAttachment`]: the immutable descriptor callers hand to the
//!   send pipeline,
//! - [`ResourceScope`]: temp-file lifetime management for one send,
//! - [`PackagedPart`]: a transport-ready part whose content is re-readable
//!   if the transport layer retries.

pub mod errors;
pub mod outgoing;
pub mod packaged;
pub mod resource;

pub use errors::AttachmentError;
pub use outgoing::{AttachmentSource, CompressionMode, OutgoingAttachment, OutgoingAttachmentBuilder};
pub use packaged::PackagedPart;
pub use resource::ResourceScope;

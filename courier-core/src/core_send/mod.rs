//! Send pipeline
//!
//! [`UserMessageBuilder`] glues discovery, attachment packaging and the
//! transport collaborator together: configure in any order, validate
//! readiness, resolve the endpoint exactly once, package parts through a
//! scoped resource helper, and hand off to the transport for the
//! send-and-await-signal round trip.

pub mod builder;
pub mod errors;
pub mod observers;
pub mod transport;

pub use builder::{FieldOverride, ProfileDefaults, UserMessageBuilder};
pub use errors::{SendError, SendResult};
pub use observers::ObserverList;
pub use transport::{
    As4Transport, DefaultIncomingAttachmentFactory, DefaultIncomingProfileSelector,
    DefaultPmodeResolver, IncomingAttachment, IncomingAttachmentFactory, IncomingConfig,
    IncomingProfileSelector, PmodeResolver, RetryEvent, SendHandles, SendHooks, SignalKind,
    SignalMessage, TransportError,
};

#[cfg(test)]
mod tests;

//! Transport collaborator boundary
//!
//! The engine that serializes, signs, sends and waits for the response
//! signal is external. The pipeline invokes it through [`As4Transport`]
//! with everything it needs: the assembled message, the destination URL,
//! crypto configuration, PMode resolution, incoming-side factories and the
//! optional dumper/retry hooks. Retry policy is owned by the collaborator;
//! packaging completes fully before it is invoked.

use crate::core_crypto::{CryptoConfig, IncomingSecurityConfig};
use crate::core_message::UserMessage;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Kind of the response signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalKind {
    /// Positive receipt
    Receipt,
    /// ebMS error signal
    Error { code: String, detail: String },
}

/// The signal message returned by the receiving access point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalMessage {
    pub message_id: Option<String>,
    pub ref_to_message_id: Option<String>,
    pub kind: SignalKind,
}

impl SignalMessage {
    pub fn is_receipt(&self) -> bool {
        matches!(self.kind, SignalKind::Receipt)
    }
}

/// One retry attempt announced by the transport collaborator
#[derive(Debug, Clone)]
pub struct RetryEvent {
    /// 1-based attempt number of the retry
    pub attempt: u32,
    /// Failure that caused the retry
    pub cause: String,
}

pub type RetryCallback = Box<dyn Fn(&RetryEvent) + Send + Sync>;
pub type WireDumper = Box<dyn Fn(&[u8]) + Send + Sync>;
pub type SignalConsumer = Box<dyn Fn(&SignalMessage) -> anyhow::Result<()> + Send + Sync>;

/// Optional hooks forwarded to the transport collaborator
#[derive(Default)]
pub struct SendHooks {
    pub retry_callback: Option<RetryCallback>,
    pub outgoing_dumper: Option<WireDumper>,
    pub incoming_dumper: Option<WireDumper>,
    pub signal_consumer: Option<SignalConsumer>,
}

impl fmt::Debug for SendHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendHooks")
            .field("retry_callback", &self.retry_callback.is_some())
            .field("outgoing_dumper", &self.outgoing_dumper.is_some())
            .field("incoming_dumper", &self.incoming_dumper.is_some())
            .field("signal_consumer", &self.signal_consumer.is_some())
            .finish()
    }
}

/// Resolves the processing mode governing one exchange
pub trait PmodeResolver: Send + Sync {
    fn resolve(&self, message: &UserMessage) -> Option<String>;
}

/// Resolves the PMode from the message's agreement reference
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPmodeResolver;

impl PmodeResolver for DefaultPmodeResolver {
    fn resolve(&self, message: &UserMessage) -> Option<String> {
        message.agreement_ref.clone()
    }
}

/// An attachment carried by the response signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingAttachment {
    pub mime_type: String,
    pub content: Vec<u8>,
}

/// Creates attachment representations for response parts
pub trait IncomingAttachmentFactory: Send + Sync {
    fn create(&self, mime_type: &str, content: Vec<u8>) -> IncomingAttachment;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIncomingAttachmentFactory;

impl IncomingAttachmentFactory for DefaultIncomingAttachmentFactory {
    fn create(&self, mime_type: &str, content: Vec<u8>) -> IncomingAttachment {
        IncomingAttachment {
            mime_type: mime_type.to_string(),
            content,
        }
    }
}

/// Selects the validation profile applied to the response signal
pub trait IncomingProfileSelector: Send + Sync {
    fn select(&self, pmode_id: Option<&str>) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIncomingProfileSelector;

impl IncomingProfileSelector for DefaultIncomingProfileSelector {
    fn select(&self, _pmode_id: Option<&str>) -> Option<String> {
        None
    }
}

/// Everything the collaborator needs to process the response side
pub struct IncomingConfig {
    pub attachment_factory: Arc<dyn IncomingAttachmentFactory>,
    pub profile_selector: Arc<dyn IncomingProfileSelector>,
    pub security: IncomingSecurityConfig,
}

impl fmt::Debug for IncomingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingConfig")
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

/// Borrowed bundle of collaborator inputs for one send
pub struct SendHandles<'a> {
    pub crypto: &'a CryptoConfig,
    pub pmode_resolver: &'a dyn PmodeResolver,
    pub incoming: &'a IncomingConfig,
    pub locale: &'a str,
    pub hooks: &'a SendHooks,
}

/// The external engine performing the signed send and the blocking wait for
/// the response signal
#[async_trait]
pub trait As4Transport: Send + Sync {
    async fn send_and_await_signal(
        &self,
        message: &UserMessage,
        destination_url: &str,
        handles: SendHandles<'_>,
    ) -> Result<SignalMessage, TransportError>;
}

/// Errors raised by the transport collaborator
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out waiting for the response signal")]
    Timeout,

    #[error("Protocol violation in response: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind() {
        let receipt = SignalMessage {
            message_id: Some("sig-1".to_string()),
            ref_to_message_id: Some("msg-1".to_string()),
            kind: SignalKind::Receipt,
        };
        assert!(receipt.is_receipt());

        let error = SignalMessage {
            message_id: None,
            ref_to_message_id: None,
            kind: SignalKind::Error {
                code: "EBMS:0004".to_string(),
                detail: "Other".to_string(),
            },
        };
        assert!(!error.is_receipt());
    }

    #[test]
    fn test_default_pmode_resolver_uses_agreement_ref() {
        use crate::core_message::{PartyInfo, Service};

        let message = UserMessage::new(
            None,
            Some("urn:example:agreement".to_string()),
            "action".to_string(),
            Service {
                scheme: None,
                value: "proc".to_string(),
            },
            PartyInfo {
                id: None,
                id_type: None,
                role: "initiator".to_string(),
            },
            PartyInfo {
                id: None,
                id_type: None,
                role: "responder".to_string(),
            },
            vec![],
        );

        assert_eq!(
            DefaultPmodeResolver.resolve(&message),
            Some("urn:example:agreement".to_string())
        );
    }
}

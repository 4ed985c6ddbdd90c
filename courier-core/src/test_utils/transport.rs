//! Mock transport collaborator
//!
//! Records every invocation, including part content read back through the
//! packaged parts, so tests can assert on ordering, destination and
//! re-readability. Can be switched into a failing mode to exercise error
//! paths and resource release.

use crate::core_message::UserMessage;
use crate::core_send::{As4Transport, SendHandles, SignalKind, SignalMessage, TransportError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded transport invocation
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub destination_url: String,
    pub message_id: String,
    pub to_party_id: Option<String>,
    pub final_recipient: Option<String>,
    pub part_content_ids: Vec<String>,
    pub part_paths: Vec<PathBuf>,
    pub part_bytes: Vec<Vec<u8>>,
    pub pmode_id: Option<String>,
    pub locale: String,
}

/// An [`As4Transport`] double
#[derive(Debug, Default)]
pub struct MockTransport {
    fail_sends: bool,
    pub invocations: Mutex<Vec<RecordedSend>>,
    pub send_count: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send with an HTTP error after recording it
    pub fn failing(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn sends(&self) -> Vec<RecordedSend> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl As4Transport for MockTransport {
    async fn send_and_await_signal(
        &self,
        message: &UserMessage,
        destination_url: &str,
        handles: SendHandles<'_>,
    ) -> Result<SignalMessage, TransportError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        let mut part_bytes = Vec::new();
        for part in message.parts() {
            // Read through the packaged part, as the real engine would
            part_bytes.push(part.read_bytes()?);
        }

        let record = RecordedSend {
            destination_url: destination_url.to_string(),
            message_id: message.message_id.clone(),
            to_party_id: message.to.id.clone(),
            final_recipient: message.property("finalRecipient").map(str::to_string),
            part_content_ids: message
                .parts()
                .iter()
                .map(|p| p.content_id().to_string())
                .collect(),
            part_paths: message
                .parts()
                .iter()
                .map(|p| p.content_path().to_path_buf())
                .collect(),
            part_bytes,
            pmode_id: handles.pmode_resolver.resolve(message),
            locale: handles.locale.to_string(),
        };
        self.invocations.lock().unwrap().push(record);

        if self.fail_sends {
            return Err(TransportError::Http {
                status: 500,
                url: destination_url.to_string(),
            });
        }

        Ok(SignalMessage {
            message_id: Some(format!("signal-{}", message.message_id)),
            ref_to_message_id: Some(message.message_id.clone()),
            kind: SignalKind::Receipt,
        })
    }
}

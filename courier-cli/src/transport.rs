//! File-dump transport
//!
//! A transport collaborator for local inspection: instead of performing the
//! network exchange it writes the assembled message and its parts into a
//! directory and answers with a synthetic receipt. Useful to check what the
//! pipeline would hand to a real AS4 engine.

use async_trait::async_trait;
use courier_core::core_message::UserMessage;
use courier_core::core_send::{
    As4Transport, SendHandles, SignalKind, SignalMessage, TransportError,
};
use std::path::PathBuf;
use tracing::info;

pub struct FileDumpTransport {
    out_dir: PathBuf,
}

impl FileDumpTransport {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

#[async_trait]
impl As4Transport for FileDumpTransport {
    async fn send_and_await_signal(
        &self,
        message: &UserMessage,
        destination_url: &str,
        handles: SendHandles<'_>,
    ) -> Result<SignalMessage, TransportError> {
        let message_dir = self.out_dir.join(&message.message_id);
        std::fs::create_dir_all(&message_dir)?;

        let header = serde_json::json!({
            "destination_url": destination_url,
            "pmode_id": handles.pmode_resolver.resolve(message),
            "locale": handles.locale,
            "receiver_certificate_der_len": handles.crypto.receiver_certificate.der().len(),
            "message": message,
        });
        let header_path = message_dir.join("message.json");
        std::fs::write(
            &header_path,
            serde_json::to_vec_pretty(&header)
                .map_err(|e| TransportError::Protocol(e.to_string()))?,
        )?;

        for (index, part) in message.parts().iter().enumerate() {
            let name = part
                .filename()
                .map(str::to_string)
                .unwrap_or_else(|| format!("part-{}.bin", index));
            let part_path = message_dir.join(format!("{:02}-{}", index, name));
            std::fs::copy(part.content_path(), &part_path)?;
            info!(
                "part {} ({}, sha256 {}) written to {}",
                index,
                part.mime_type(),
                part.sha256_hex()?,
                part_path.display()
            );
        }

        info!(
            "message {} for {} dumped to {}",
            message.message_id,
            destination_url,
            message_dir.display()
        );

        Ok(SignalMessage {
            message_id: Some(format!("dump-{}", message.message_id)),
            ref_to_message_id: Some(message.message_id.clone()),
            kind: SignalKind::Receipt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::core_attachment::{OutgoingAttachment, PackagedPart, ResourceScope};
    use courier_core::core_crypto::{CryptParams, CryptoConfig, ReceiverCertificate, SigningParams};
    use courier_core::core_message::{PartyInfo, Service};
    use courier_core::core_send::{
        DefaultIncomingAttachmentFactory, DefaultIncomingProfileSelector, DefaultPmodeResolver,
        IncomingConfig, SendHooks,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dump_writes_header_and_parts() {
        let out = tempfile::tempdir().unwrap();
        let transport = FileDumpTransport::new(out.path().to_path_buf());

        let mut message = UserMessage::new(
            None,
            None,
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
                id: Some("AP".to_string()),
                id_type: None,
                role: "responder".to_string(),
            },
            vec![],
        );

        let mut scope = ResourceScope::new();
        let attachment = OutgoingAttachment::builder()
            .data(b"<Invoice/>".to_vec())
            .mime_type("application/xml")
            .filename("invoice.xml")
            .build()
            .unwrap();
        message.add_part(PackagedPart::package(&attachment, &mut scope).unwrap());

        let crypto = CryptoConfig::assemble(
            SigningParams::default(),
            CryptParams::default(),
            ReceiverCertificate::from_der(vec![1, 2, 3]),
        );
        let incoming = IncomingConfig {
            attachment_factory: Arc::new(DefaultIncomingAttachmentFactory),
            profile_selector: Arc::new(DefaultIncomingProfileSelector),
            security: crypto.incoming_security(),
        };
        let hooks = SendHooks::default();
        let handles = SendHandles {
            crypto: &crypto,
            pmode_resolver: &DefaultPmodeResolver,
            incoming: &incoming,
            locale: "en",
            hooks: &hooks,
        };

        let signal = transport
            .send_and_await_signal(&message, "https://ap.example/as4", handles)
            .await
            .unwrap();
        assert!(signal.is_receipt());

        let message_dir = out.path().join(&message.message_id);
        assert!(message_dir.join("message.json").exists());
        assert!(message_dir.join("00-invoice.xml").exists());
        assert_eq!(
            std::fs::read(message_dir.join("00-invoice.xml")).unwrap(),
            b"<Invoice/>"
        );
    }
}

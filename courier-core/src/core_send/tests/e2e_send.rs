//! End-to-end send scenario

use super::{doc_type, payload, process, receiver};
use crate::core_attachment::OutgoingAttachment;
use crate::core_message::constants::PEPPOL_AGREEMENT_REF;
use crate::core_send::UserMessageBuilder;
use crate::test_utils::{receiver_certificate, MockTransport};
use std::sync::Arc;

#[tokio::test]
async fn test_full_send_with_constant_provider() {
    let transport = Arc::new(MockTransport::new());
    let certificate = receiver_certificate("POP000306");

    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .sender_participant_id(crate::core_ident::ParticipantId::with_default_scheme(
            "0088:0000000000",
        ))
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"<Invoice>42</Invoice>"))
        .receiver_endpoint_details(certificate, "https://ap.example/as4")
        .transport(transport.clone());

    let signal = builder.send().await.unwrap();
    assert!(signal.is_receipt());

    // Exactly one transport invocation against the resolved URL
    let sends = transport.sends();
    assert_eq!(sends.len(), 1);
    let send = &sends[0];
    assert_eq!(send.destination_url, "https://ap.example/as4");

    // One primary attachment carrying the payload bytes
    assert_eq!(send.part_bytes.len(), 1);
    assert_eq!(send.part_bytes[0], b"<Invoice>42</Invoice>");

    // Receiver party id derived from the certificate subject CN
    assert_eq!(send.to_party_id.as_deref(), Some("POP000306"));

    // Receiver participant ends up in the finalRecipient property
    assert_eq!(
        send.final_recipient.as_deref(),
        Some(receiver().uri_encoded().as_str())
    );

    // PMode resolved from the profile default agreement
    assert_eq!(send.pmode_id.as_deref(), Some(PEPPOL_AGREEMENT_REF));

    assert!(builder.effective_sending_date_time().is_some());
    assert_eq!(builder.resolved_endpoint_url(), Some("https://ap.example/as4"));
}

#[tokio::test]
async fn test_packaging_order_payload_first_then_insertion_order() {
    let transport = Arc::new(MockTransport::new());

    let aux = |content: &[u8], name: &str| -> OutgoingAttachment {
        OutgoingAttachment::builder()
            .data(content.to_vec())
            .mime_type("application/octet-stream")
            .filename(name)
            .build()
            .unwrap()
    };

    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .add_attachment(aux(b"first extra", "a.bin"))
        .payload(payload(b"<Invoice/>"))
        .add_attachment(aux(b"second extra", "b.bin"))
        .receiver_endpoint_details(receiver_certificate("POP000306"), "https://ap.example/as4")
        .transport(transport.clone());

    builder.send().await.unwrap();

    let sends = transport.sends();
    let bytes = &sends[0].part_bytes;
    // Primary payload always precedes the auxiliary attachments, which keep
    // their insertion order regardless of when the payload was set
    assert_eq!(bytes.len(), 3);
    assert_eq!(bytes[0], b"<Invoice/>");
    assert_eq!(bytes[1], b"first extra");
    assert_eq!(bytes[2], b"second extra");

    let ids = &sends[0].part_content_ids;
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_locale_and_conversation_id_are_forwarded() {
    let transport = Arc::new(MockTransport::new());

    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"<Invoice/>"))
        .conversation_id("conv-42")
        .locale("de")
        .receiver_endpoint_details(receiver_certificate("POP000306"), "https://ap.example/as4")
        .transport(transport.clone());

    let signal = builder.send().await.unwrap();

    let sends = transport.sends();
    assert_eq!(sends[0].locale, "de");
    // The signal references the sent message
    assert_eq!(
        signal.ref_to_message_id.as_deref(),
        Some(sends[0].message_id.as_str())
    );
}

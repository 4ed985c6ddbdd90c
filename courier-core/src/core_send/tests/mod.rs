//! Send pipeline tests

use crate::core_attachment::OutgoingAttachment;
use crate::core_discovery::SmpEndpoint;
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId};
use crate::test_utils::receiver_certificate;

mod e2e_send;
mod lifecycle;

fn receiver() -> ParticipantId {
    ParticipantId::with_default_scheme("0088:1234567890")
}

fn doc_type() -> DocTypeId {
    DocTypeId::with_default_scheme("urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice")
}

fn process() -> ProcessId {
    ProcessId::with_default_scheme("urn:fdc:peppol.eu:2017:poacc:billing:01:1.0")
}

fn payload(bytes: &[u8]) -> OutgoingAttachment {
    OutgoingAttachment::builder()
        .data(bytes.to_vec())
        .mime_type("application/xml")
        .filename("document.xml")
        .build()
        .unwrap()
}

/// An SMP endpoint record for the Peppol AS4 v2 profile whose certificate
/// subject CN is `common_name`
fn smp_endpoint(common_name: &str, url: &str) -> SmpEndpoint {
    SmpEndpoint {
        transport_profile: "peppol-transport-as4-v2_0".to_string(),
        address: Some(url.to_string()),
        certificate_b64: Some(receiver_certificate(common_name).to_base64()),
    }
}

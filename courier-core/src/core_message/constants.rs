//! ebMS3 and profile constants

/// Default ebMS3 role URL of the sending party
pub const DEFAULT_INITIATOR_ROLE: &str =
    "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/initiator";

/// Default ebMS3 role URL of the receiving party
pub const DEFAULT_RESPONDER_ROLE: &str =
    "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/responder";

/// Agreement reference of the Peppol transport infrastructure agreement
pub const PEPPOL_AGREEMENT_REF: &str = "urn:fdc:peppol.eu:2017:agreements:tia:ap_provider";

/// Party identifier type used for Peppol access points
pub const PEPPOL_PARTY_ID_TYPE: &str = "urn:fdc:peppol.eu:2017:identifiers:ap";

/// Message property naming the end recipient of the business document
pub const PROPERTY_FINAL_RECIPIENT: &str = "finalRecipient";

/// Message property naming the original sender of the business document
pub const PROPERTY_ORIGINAL_SENDER: &str = "originalSender";

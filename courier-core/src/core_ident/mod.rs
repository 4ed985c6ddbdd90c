//! Protocol identifiers
//!
//! Value types identifying the participants, document types, processes and
//! wire transport profiles of an exchange. All of them are immutable,
//! comparable, and carry a canonical URI-style string encoding used in
//! lookups, message headers and error messages.

pub mod identifier;
pub mod transport_profile;

pub use identifier::{
    DocTypeId, ParticipantId, ProcessId, DEFAULT_DOCTYPE_SCHEME, DEFAULT_PARTICIPANT_SCHEME,
    DEFAULT_PROCESS_SCHEME, DOCTYPE_WILDCARD_SCHEME,
};
pub use transport_profile::TransportProfile;

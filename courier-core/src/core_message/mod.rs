//! ebMS3 user message shell
//!
//! The outbound message as handed to the transport collaborator: header
//! fields, message properties and the ordered attachment parts. Wire
//! serialization (SOAP/MIME) is the transport collaborator's concern.

pub mod constants;
pub mod user_message;

pub use user_message::{MessageProperty, PartyInfo, Service, UserMessage};

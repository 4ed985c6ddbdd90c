//! Courier - outbound AS4 (ebMS3) messaging client
//!
//! Courier implements the sending half of an AS4 business-document exchange:
//! resolve the receiving access point through a pluggable discovery provider,
//! package the document and auxiliary files as MIME attachment parts, and
//! drive a synchronous send-and-await-signal round trip through a transport
//! collaborator.
//!
//! The entry point is [`core_send::UserMessageBuilder`].

pub mod config;
pub mod core_attachment;
pub mod core_crypto;
pub mod core_discovery;
pub mod core_ident;
pub mod core_message;
pub mod core_send;
pub mod logging;
pub mod metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use core_send::{SendError, SendResult, UserMessageBuilder};
pub use logging::{init_logging, LogLevel};

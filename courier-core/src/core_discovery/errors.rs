//! Error types for endpoint discovery

use super::smp::SmpClientError;
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId};
use std::fmt;
use thiserror::Error;

/// The identifier triple and transport profile of one lookup, carried by
/// every discovery error for diagnosability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub receiver: ParticipantId,
    pub doc_type: DocTypeId,
    pub process: ProcessId,
    pub transport_profile: String,
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.receiver.uri_encoded(),
            self.doc_type.uri_encoded(),
            self.process.uri_encoded(),
            self.transport_profile
        )
    }
}

/// Which lookup path a live provider took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPath {
    Direct,
    Wildcard,
}

impl LookupPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupPath::Direct => "direct",
            LookupPath::Wildcard => "wildcard",
        }
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while resolving or reading endpoint details
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The metadata lookup call itself failed
    #[error("Failed to resolve SMP endpoint {query}")]
    Lookup {
        query: LookupQuery,
        #[source]
        source: SmpClientError,
    },

    /// The lookup succeeded but yielded no endpoint for the given
    /// process/transport-profile combination
    #[error("Failed to resolve SMP endpoint {query} [{path}]")]
    NoEndpoint { query: LookupQuery, path: LookupPath },

    /// The resolved record carries certificate data that cannot be decoded
    #[error("Failed to extract receiver certificate from SMP endpoint: {0}")]
    BadCertificate(String),

    /// The resolved record carries no certificate at all
    #[error("SMP endpoint record carries no certificate")]
    MissingCertificate,

    /// The resolved record carries no usable address
    #[error("Failed to determine the destination URL from the SMP endpoint")]
    MissingAddress,

    /// Endpoint details were requested before a successful `init`
    #[error("Endpoint details requested before discovery ran")]
    NotResolved,
}

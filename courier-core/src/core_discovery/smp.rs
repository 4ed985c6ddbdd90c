//! Service metadata publisher (SMP) client boundary
//!
//! The wire client that talks to a live SMP is an external collaborator;
//! this module defines the records it returns and the trait the discovery
//! providers consume. [`StaticSmpCatalog`] is the in-tree implementation
//! for static deployments and tests.

use crate::core_crypto::{CertificateError, ReceiverCertificate};
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId, TransportProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Selection mode for wildcard document-type lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WildcardMode {
    /// Only entries explicitly registered as wildcard matches are eligible
    #[default]
    WildcardOnly,
    /// Prefer an exact busdox registration, fall back to wildcard matches
    BusdoxThenWildcard,
    /// Prefer wildcard matches, fall back to an exact busdox registration
    WildcardThenBusdox,
}

impl WildcardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WildcardMode::WildcardOnly => "wildcard-only",
            WildcardMode::BusdoxThenWildcard => "busdox-then-wildcard",
            WildcardMode::WildcardThenBusdox => "wildcard-then-busdox",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "wildcard-only" => Some(WildcardMode::WildcardOnly),
            "busdox-then-wildcard" => Some(WildcardMode::BusdoxThenWildcard),
            "wildcard-then-busdox" => Some(WildcardMode::WildcardThenBusdox),
            _ => None,
        }
    }
}

/// One endpoint registration inside an SMP record
///
/// This is the provider-native representation cached by the discovery
/// providers; certificate and address extraction happen lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmpEndpoint {
    /// Transport profile identifier this endpoint is registered for
    pub transport_profile: String,
    /// Destination address of the access point
    pub address: Option<String>,
    /// Base64-encoded DER certificate of the access point
    pub certificate_b64: Option<String>,
}

impl SmpEndpoint {
    /// Decode the access-point certificate carried by the record
    pub fn certificate(&self) -> Result<Option<ReceiverCertificate>, CertificateError> {
        match &self.certificate_b64 {
            None => Ok(None),
            Some(encoded) => ReceiverCertificate::from_base64(encoded).map(Some),
        }
    }

    /// The destination address, if the record carries a non-empty one
    pub fn address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Endpoints registered for one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEndpoints {
    pub process: ProcessId,
    pub endpoints: Vec<SmpEndpoint>,
}

/// A resolved service metadata document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub processes: Vec<ProcessEndpoints>,
}

impl ServiceMetadata {
    /// Extract the endpoint registered for the given process and transport
    /// profile
    pub fn endpoint_for(
        &self,
        process: &ProcessId,
        profile: &TransportProfile,
    ) -> Option<&SmpEndpoint> {
        self.processes
            .iter()
            .filter(|entry| &entry.process == process)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|endpoint| endpoint.transport_profile == profile.id())
    }
}

/// Errors raised by a metadata client
#[derive(Debug, Error)]
pub enum SmpClientError {
    /// The lookup call could not reach the publisher
    #[error("SMP network error: {0}")]
    Network(String),

    /// The publisher answered with an unexpected HTTP status
    #[error("SMP returned HTTP status {status}")]
    Http { status: u16 },

    /// The publisher's response could not be interpreted
    #[error("Malformed SMP response: {0}")]
    BadPayload(String),
}

/// A client able to resolve service metadata for a participant
///
/// `supports_wildcard` advertises whether `wildcard_service_metadata` is
/// implemented; clients without wildcard support keep the defaults.
#[async_trait]
pub trait ServiceMetadataProvider: Send + Sync {
    /// Exact lookup of the endpoint registered for the full identifier tuple
    async fn endpoint(
        &self,
        receiver: &ParticipantId,
        doc_type: &DocTypeId,
        process: &ProcessId,
        profile: &TransportProfile,
    ) -> Result<Option<SmpEndpoint>, SmpClientError>;

    /// Whether this client can answer wildcard document-type queries
    fn supports_wildcard(&self) -> bool {
        false
    }

    /// Resolve the best-matching signed metadata document for a wildcard
    /// document-type identifier
    async fn wildcard_service_metadata(
        &self,
        _receiver: &ParticipantId,
        _doc_type: &DocTypeId,
        _mode: WildcardMode,
    ) -> Result<Option<ServiceMetadata>, SmpClientError> {
        Ok(None)
    }
}

/// Shared handle to a metadata client
pub type SharedServiceMetadataProvider = Arc<dyn ServiceMetadataProvider>;

/// In-memory metadata catalog keyed by (receiver, document type)
///
/// Serves deployments whose endpoint details are distributed out-of-band,
/// and test setups that need a lookup-capable client without a network.
#[derive(Debug, Default)]
pub struct StaticSmpCatalog {
    entries: HashMap<(ParticipantId, DocTypeId), ServiceMetadata>,
}

impl StaticSmpCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a full metadata document for a (receiver, document type) key
    pub fn insert(
        &mut self,
        receiver: ParticipantId,
        doc_type: DocTypeId,
        metadata: ServiceMetadata,
    ) {
        self.entries.insert((receiver, doc_type), metadata);
    }

    /// Register a single endpoint for a (receiver, document type, process) key
    pub fn insert_endpoint(
        &mut self,
        receiver: ParticipantId,
        doc_type: DocTypeId,
        process: ProcessId,
        endpoint: SmpEndpoint,
    ) {
        let metadata = self
            .entries
            .entry((receiver, doc_type))
            .or_insert_with(ServiceMetadata::default);
        if let Some(entry) = metadata
            .processes
            .iter_mut()
            .find(|entry| entry.process == process)
        {
            entry.endpoints.push(endpoint);
        } else {
            metadata.processes.push(ProcessEndpoints {
                process,
                endpoints: vec![endpoint],
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ServiceMetadataProvider for StaticSmpCatalog {
    async fn endpoint(
        &self,
        receiver: &ParticipantId,
        doc_type: &DocTypeId,
        process: &ProcessId,
        profile: &TransportProfile,
    ) -> Result<Option<SmpEndpoint>, SmpClientError> {
        let key = (receiver.clone(), doc_type.clone());
        Ok(self
            .entries
            .get(&key)
            .and_then(|metadata| metadata.endpoint_for(process, profile))
            .cloned())
    }
}

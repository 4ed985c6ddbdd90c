//! Endpoint detail provider contract
//!
//! One capability set over all discovery strategies. A provider resolves
//! exactly once and caches the result on itself; the resolution state is an
//! explicit tag rather than a nullable field so the "exactly once, silently
//! idempotent" contract is visible and testable.

use super::errors::DiscoveryError;
use super::smp::SmpEndpoint;
use crate::core_crypto::ReceiverCertificate;
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId};
use async_trait::async_trait;

/// Resolution state of a live discovery provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EndpointState {
    #[default]
    Unresolved,
    Resolved(SmpEndpoint),
}

impl EndpointState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, EndpointState::Resolved(_))
    }

    /// The cached endpoint record, if resolution happened
    pub fn endpoint(&self) -> Option<&SmpEndpoint> {
        match self {
            EndpointState::Unresolved => None,
            EndpointState::Resolved(endpoint) => Some(endpoint),
        }
    }
}

/// Discovery strategy resolving the receiver's access-point details
///
/// Implementations are reusable across sequential sends; concurrent `init`
/// calls on one instance must be serialized by the caller.
#[async_trait]
pub trait EndpointDetailProvider: Send + Sync {
    /// Perform discovery exactly once
    ///
    /// A second call with the endpoint already resolved is a silent no-op.
    /// The arguments of that second call are NOT re-validated against the
    /// first resolution: invoking `init` with different identifiers after a
    /// successful resolution silently reuses the stale result.
    async fn init(
        &mut self,
        doc_type: &DocTypeId,
        process: &ProcessId,
        receiver: &ParticipantId,
    ) -> Result<(), DiscoveryError>;

    /// The resolved access-point certificate
    ///
    /// Fails with [`DiscoveryError::NotResolved`] before a successful
    /// `init`, and with a certificate error when the resolved record's
    /// certificate data is unusable.
    fn receiver_certificate(&self) -> Result<ReceiverCertificate, DiscoveryError>;

    /// The resolved destination URL, guaranteed non-empty
    fn receiver_endpoint_url(&self) -> Result<String, DiscoveryError>;
}

/// Certificate extraction shared by the live providers
pub(crate) fn certificate_from_state(
    state: &EndpointState,
) -> Result<ReceiverCertificate, DiscoveryError> {
    let endpoint = state.endpoint().ok_or(DiscoveryError::NotResolved)?;
    endpoint
        .certificate()
        .map_err(|e| DiscoveryError::BadCertificate(e.to_string()))?
        .ok_or(DiscoveryError::MissingCertificate)
}

/// URL extraction shared by the live providers
pub(crate) fn url_from_state(state: &EndpointState) -> Result<String, DiscoveryError> {
    let endpoint = state.endpoint().ok_or(DiscoveryError::NotResolved)?;
    endpoint
        .address()
        .map(str::to_string)
        .ok_or(DiscoveryError::MissingAddress)
}

//! Live Peppol SMP discovery provider
//!
//! Wraps a network-capable metadata client. Wildcard document-type
//! identifiers take the wildcard lookup path when the client supports it;
//! everything else is an exact lookup. Both paths extract the endpoint
//! registered for the process and transport profile.

use super::errors::{DiscoveryError, LookupPath, LookupQuery};
use super::provider::{certificate_from_state, url_from_state, EndpointDetailProvider, EndpointState};
use super::smp::{ServiceMetadataProvider, SmpEndpoint, WildcardMode};
use crate::core_crypto::ReceiverCertificate;
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId, TransportProfile};
use crate::metrics;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Endpoint detail provider backed by a Peppol SMP client
pub struct PeppolEndpointProvider {
    client: Arc<dyn ServiceMetadataProvider>,
    wildcard_mode: WildcardMode,
    transport_profile: TransportProfile,
    state: EndpointState,
}

impl PeppolEndpointProvider {
    /// Default wildcard selection mode
    pub const DEFAULT_WILDCARD_MODE: WildcardMode = WildcardMode::WildcardOnly;

    /// Default transport profile for Peppol lookups
    pub const DEFAULT_TRANSPORT_PROFILE: TransportProfile = TransportProfile::PeppolAs4V2;

    pub fn new(client: Arc<dyn ServiceMetadataProvider>) -> Self {
        Self {
            client,
            wildcard_mode: Self::DEFAULT_WILDCARD_MODE,
            transport_profile: Self::DEFAULT_TRANSPORT_PROFILE,
            state: EndpointState::Unresolved,
        }
    }

    /// Change the wildcard selection mode
    ///
    /// Only has an effect when set before `init` resolves.
    pub fn with_wildcard_mode(mut self, mode: WildcardMode) -> Self {
        self.wildcard_mode = mode;
        self
    }

    /// Change the transport profile used in lookups
    ///
    /// Only has an effect when set before `init` resolves.
    pub fn with_transport_profile(mut self, profile: TransportProfile) -> Self {
        self.transport_profile = profile;
        self
    }

    pub fn wildcard_mode(&self) -> WildcardMode {
        self.wildcard_mode
    }

    pub fn transport_profile(&self) -> &TransportProfile {
        &self.transport_profile
    }

    /// The cached endpoint record, if `init` resolved
    pub fn endpoint(&self) -> Option<&SmpEndpoint> {
        self.state.endpoint()
    }

    fn query(
        &self,
        doc_type: &DocTypeId,
        process: &ProcessId,
        receiver: &ParticipantId,
    ) -> LookupQuery {
        LookupQuery {
            receiver: receiver.clone(),
            doc_type: doc_type.clone(),
            process: process.clone(),
            transport_profile: self.transport_profile.id().to_string(),
        }
    }
}

#[async_trait]
impl EndpointDetailProvider for PeppolEndpointProvider {
    async fn init(
        &mut self,
        doc_type: &DocTypeId,
        process: &ProcessId,
        receiver: &ParticipantId,
    ) -> Result<(), DiscoveryError> {
        // Resolve only once; later calls are silent no-ops
        if self.state.is_resolved() {
            debug!("SMP endpoint already resolved, skipping lookup");
            return Ok(());
        }

        let wildcard = doc_type.is_wildcard() && self.client.supports_wildcard();
        let path = if wildcard {
            LookupPath::Wildcard
        } else {
            LookupPath::Direct
        };
        let query = self.query(doc_type, process, receiver);
        debug!("Start performing SMP lookup {} [{}]", query, path);

        let lookup = if wildcard {
            self.client
                .wildcard_service_metadata(receiver, doc_type, self.wildcard_mode)
                .await
                .map(|metadata| {
                    metadata.and_then(|m| {
                        m.endpoint_for(process, &self.transport_profile).cloned()
                    })
                })
        } else {
            self.client
                .endpoint(receiver, doc_type, process, &self.transport_profile)
                .await
        };

        let endpoint = lookup.map_err(|source| {
            metrics::smp_lookup(path.as_str(), "error");
            DiscoveryError::Lookup {
                query: query.clone(),
                source,
            }
        })?;

        match endpoint {
            Some(endpoint) => {
                metrics::smp_lookup(path.as_str(), "resolved");
                debug!("Successfully resolved SMP endpoint {} [{}]", query, path);
                self.state = EndpointState::Resolved(endpoint);
                Ok(())
            }
            None => {
                metrics::smp_lookup(path.as_str(), "no_endpoint");
                Err(DiscoveryError::NoEndpoint { query, path })
            }
        }
    }

    fn receiver_certificate(&self) -> Result<ReceiverCertificate, DiscoveryError> {
        certificate_from_state(&self.state)
    }

    fn receiver_endpoint_url(&self) -> Result<String, DiscoveryError> {
        url_from_state(&self.state)
    }
}

impl std::fmt::Debug for PeppolEndpointProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeppolEndpointProvider")
            .field("wildcard_mode", &self.wildcard_mode)
            .field("transport_profile", &self.transport_profile)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

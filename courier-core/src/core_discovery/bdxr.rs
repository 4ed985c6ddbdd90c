//! Live BDXR SMP discovery provider
//!
//! Same shape as the Peppol provider without wildcard support: every lookup
//! is an exact match on the full identifier tuple.

use super::errors::{DiscoveryError, LookupPath, LookupQuery};
use super::provider::{certificate_from_state, url_from_state, EndpointDetailProvider, EndpointState};
use super::smp::{ServiceMetadataProvider, SmpEndpoint};
use crate::core_crypto::ReceiverCertificate;
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId, TransportProfile};
use crate::metrics;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Endpoint detail provider backed by an OASIS BDXR SMP client
pub struct BdxrEndpointProvider {
    client: Arc<dyn ServiceMetadataProvider>,
    transport_profile: TransportProfile,
    state: EndpointState,
}

impl BdxrEndpointProvider {
    /// Default transport profile for BDXR lookups
    pub const DEFAULT_TRANSPORT_PROFILE: TransportProfile = TransportProfile::BdxrAs4;

    pub fn new(client: Arc<dyn ServiceMetadataProvider>) -> Self {
        Self {
            client,
            transport_profile: Self::DEFAULT_TRANSPORT_PROFILE,
            state: EndpointState::Unresolved,
        }
    }

    /// Change the transport profile used in lookups
    ///
    /// Only has an effect when set before `init` resolves.
    pub fn with_transport_profile(mut self, profile: TransportProfile) -> Self {
        self.transport_profile = profile;
        self
    }

    pub fn transport_profile(&self) -> &TransportProfile {
        &self.transport_profile
    }

    /// The cached endpoint record, if `init` resolved
    pub fn endpoint(&self) -> Option<&SmpEndpoint> {
        self.state.endpoint()
    }
}

#[async_trait]
impl EndpointDetailProvider for BdxrEndpointProvider {
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

        let query = LookupQuery {
            receiver: receiver.clone(),
            doc_type: doc_type.clone(),
            process: process.clone(),
            transport_profile: self.transport_profile.id().to_string(),
        };
        debug!("Start performing SMP lookup {}", query);

        let endpoint = self
            .client
            .endpoint(receiver, doc_type, process, &self.transport_profile)
            .await
            .map_err(|source| {
                metrics::smp_lookup(LookupPath::Direct.as_str(), "error");
                DiscoveryError::Lookup {
                    query: query.clone(),
                    source,
                }
            })?;

        match endpoint {
            Some(endpoint) => {
                metrics::smp_lookup(LookupPath::Direct.as_str(), "resolved");
                debug!("Successfully resolved SMP endpoint {}", query);
                self.state = EndpointState::Resolved(endpoint);
                Ok(())
            }
            None => {
                metrics::smp_lookup(LookupPath::Direct.as_str(), "no_endpoint");
                Err(DiscoveryError::NoEndpoint {
                    query,
                    path: LookupPath::Direct,
                })
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

impl std::fmt::Debug for BdxrEndpointProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BdxrEndpointProvider")
            .field("transport_profile", &self.transport_profile)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

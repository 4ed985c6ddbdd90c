//! Constant endpoint detail provider
//!
//! Holds a pre-supplied certificate and URL, for callers who already
//! resolved the receiver's details out-of-band and for test configurations
//! that must bypass network discovery entirely.

use super::errors::DiscoveryError;
use super::provider::EndpointDetailProvider;
use crate::core_crypto::ReceiverCertificate;
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId};
use async_trait::async_trait;

/// Endpoint detail provider with statically supplied details
#[derive(Debug, Clone)]
pub struct ConstantEndpointProvider {
    certificate: ReceiverCertificate,
    endpoint_url: String,
}

impl ConstantEndpointProvider {
    pub fn new(certificate: ReceiverCertificate, endpoint_url: impl Into<String>) -> Self {
        Self {
            certificate,
            endpoint_url: endpoint_url.into(),
        }
    }
}

#[async_trait]
impl EndpointDetailProvider for ConstantEndpointProvider {
    async fn init(
        &mut self,
        _doc_type: &DocTypeId,
        _process: &ProcessId,
        _receiver: &ParticipantId,
    ) -> Result<(), DiscoveryError> {
        // Details are pre-resolved; nothing to look up
        Ok(())
    }

    fn receiver_certificate(&self) -> Result<ReceiverCertificate, DiscoveryError> {
        Ok(self.certificate.clone())
    }

    fn receiver_endpoint_url(&self) -> Result<String, DiscoveryError> {
        Ok(self.endpoint_url.clone())
    }
}

//! Mock SMP client
//!
//! Records which lookup path executed and how often, so tests can assert
//! on idempotence and wildcard path selection.

use crate::core_discovery::{
    ServiceMetadata, ServiceMetadataProvider, SmpClientError, SmpEndpoint, WildcardMode,
};
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId, TransportProfile};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`ServiceMetadataProvider`] double with canned responses and lookup
/// counters
#[derive(Debug, Default)]
pub struct MockSmpClient {
    wildcard_capable: bool,
    endpoint: Option<SmpEndpoint>,
    metadata: Option<ServiceMetadata>,
    fail_lookups: bool,
    pub direct_lookups: AtomicUsize,
    pub wildcard_lookups: AtomicUsize,
}

impl MockSmpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to direct lookups with this endpoint
    pub fn with_endpoint(mut self, endpoint: SmpEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Respond to wildcard lookups with this metadata document
    pub fn with_metadata(mut self, metadata: ServiceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Advertise wildcard support
    pub fn wildcard_capable(mut self) -> Self {
        self.wildcard_capable = true;
        self
    }

    /// Fail every lookup with a network error
    pub fn failing(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn direct_lookup_count(&self) -> usize {
        self.direct_lookups.load(Ordering::SeqCst)
    }

    pub fn wildcard_lookup_count(&self) -> usize {
        self.wildcard_lookups.load(Ordering::SeqCst)
    }

    pub fn total_lookup_count(&self) -> usize {
        self.direct_lookup_count() + self.wildcard_lookup_count()
    }
}

#[async_trait]
impl ServiceMetadataProvider for MockSmpClient {
    async fn endpoint(
        &self,
        _receiver: &ParticipantId,
        _doc_type: &DocTypeId,
        _process: &ProcessId,
        _profile: &TransportProfile,
    ) -> Result<Option<SmpEndpoint>, SmpClientError> {
        self.direct_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(SmpClientError::Network("mock lookup failure".to_string()));
        }
        Ok(self.endpoint.clone())
    }

    fn supports_wildcard(&self) -> bool {
        self.wildcard_capable
    }

    async fn wildcard_service_metadata(
        &self,
        _receiver: &ParticipantId,
        _doc_type: &DocTypeId,
        _mode: WildcardMode,
    ) -> Result<Option<ServiceMetadata>, SmpClientError> {
        self.wildcard_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(SmpClientError::Network("mock lookup failure".to_string()));
        }
        Ok(self.metadata.clone())
    }
}

//! Endpoint discovery
//!
//! Maps a (receiver, document type, process, transport profile) tuple to the
//! receiving access point's URL and certificate. Discovery is expressed as
//! one capability set ([`EndpointDetailProvider`]) over interchangeable
//! strategies, so the send pipeline needs no knowledge of which lookup
//! protocol, if any, is behind it:
//! - [`PeppolEndpointProvider`]: live SMP lookup, wildcard-aware,
//! - [`BdxrEndpointProvider`]: live SMP lookup, exact match only,
//! - [`ConstantEndpointProvider`]: pre-resolved certificate and URL.

pub mod bdxr;
pub mod constant;
pub mod errors;
pub mod peppol;
pub mod provider;
pub mod smp;

pub use bdxr::BdxrEndpointProvider;
pub use constant::ConstantEndpointProvider;
pub use errors::{DiscoveryError, LookupPath, LookupQuery};
pub use peppol::PeppolEndpointProvider;
pub use provider::{EndpointDetailProvider, EndpointState};
pub use smp::{
    ProcessEndpoints, ServiceMetadata, ServiceMetadataProvider, SharedServiceMetadataProvider,
    SmpClientError, SmpEndpoint, StaticSmpCatalog, WildcardMode,
};

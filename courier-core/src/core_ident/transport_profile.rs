//! Wire transport profile identifiers
//!
//! A transport profile selects the concrete wire-level binding an endpoint
//! is registered for. SMP records are keyed on the profile's stable
//! identifier string, and lookup errors carry it for diagnosability.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the wire-level transport binding of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportProfile {
    /// AS4 v2 over the Peppol network
    PeppolAs4V2,
    /// OASIS BDXR AS4
    BdxrAs4,
    /// Any other registered profile identifier
    Custom(String),
}

impl TransportProfile {
    /// The stable identifier string used in SMP records and error messages
    pub fn id(&self) -> &str {
        match self {
            TransportProfile::PeppolAs4V2 => "peppol-transport-as4-v2_0",
            TransportProfile::BdxrAs4 => "bdxr-transport-ebms3-as4-v1p0",
            TransportProfile::Custom(id) => id,
        }
    }

    /// Resolve a profile from its identifier string
    pub fn from_id(id: &str) -> Self {
        match id {
            "peppol-transport-as4-v2_0" => TransportProfile::PeppolAs4V2,
            "bdxr-transport-ebms3-as4-v1p0" => TransportProfile::BdxrAs4,
            other => TransportProfile::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for TransportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

//! Participant, document type and process identifiers
//!
//! Each identifier is a scheme + value pair. The canonical encoding is
//! `scheme::value`, the form service metadata publishers key their records
//! on and the form that ends up in ebMS3 headers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default scheme for participant identifiers
pub const DEFAULT_PARTICIPANT_SCHEME: &str = "iso6523-actorid-upis";

/// Default scheme for document type identifiers
pub const DEFAULT_DOCTYPE_SCHEME: &str = "busdox-docid-qns";

/// Scheme marking a document type identifier as a wildcard pattern
pub const DOCTYPE_WILDCARD_SCHEME: &str = "peppol-doctype-wildcard";

/// Default scheme for process identifiers
pub const DEFAULT_PROCESS_SCHEME: &str = "cenbii-procid-ubl";

/// Identifies a participant (sender or receiver) on the network
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId {
    scheme: String,
    value: String,
}

impl ParticipantId {
    /// Create a participant identifier from an explicit scheme and value
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            value: value.into(),
        }
    }

    /// Create a participant identifier with the default scheme
    pub fn with_default_scheme(value: impl Into<String>) -> Self {
        Self::new(DEFAULT_PARTICIPANT_SCHEME, value)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Canonical `scheme::value` encoding
    pub fn uri_encoded(&self) -> String {
        format!("{}::{}", self.scheme, self.value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.scheme, self.value)
    }
}

/// Identifies the type of business document being exchanged
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocTypeId {
    scheme: String,
    value: String,
}

impl DocTypeId {
    /// Create a document type identifier from an explicit scheme and value
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            value: value.into(),
        }
    }

    /// Create a document type identifier with the default scheme
    pub fn with_default_scheme(value: impl Into<String>) -> Self {
        Self::new(DEFAULT_DOCTYPE_SCHEME, value)
    }

    /// Create a wildcard document type identifier
    pub fn wildcard(value: impl Into<String>) -> Self {
        Self::new(DOCTYPE_WILDCARD_SCHEME, value)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when this identifier uses the registered wildcard scheme
    pub fn is_wildcard(&self) -> bool {
        self.scheme == DOCTYPE_WILDCARD_SCHEME
    }

    /// Canonical `scheme::value` encoding
    pub fn uri_encoded(&self) -> String {
        format!("{}::{}", self.scheme, self.value)
    }
}

impl fmt::Display for DocTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.scheme, self.value)
    }
}

/// Identifies the business process a document belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessId {
    scheme: String,
    value: String,
}

impl ProcessId {
    /// Create a process identifier from an explicit scheme and value
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            value: value.into(),
        }
    }

    /// Create a process identifier with the default scheme
    pub fn with_default_scheme(value: impl Into<String>) -> Self {
        Self::new(DEFAULT_PROCESS_SCHEME, value)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Canonical `scheme::value` encoding
    pub fn uri_encoded(&self) -> String {
        format!("{}::{}", self.scheme, self.value)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.scheme, self.value)
    }
}

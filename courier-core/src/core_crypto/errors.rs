//! Error types for certificate handling

use thiserror::Error;

/// Errors raised while decoding or inspecting a receiver certificate
#[derive(Debug, Clone, Error)]
pub enum CertificateError {
    /// The base64 transport encoding could not be decoded
    #[error("Invalid base64 certificate encoding: {0}")]
    Base64(String),

    /// The DER structure could not be parsed
    #[error("Failed to parse X.509 certificate: {0}")]
    Parse(String),

    /// The subject distinguished name carries no common name attribute
    #[error("Certificate subject has no common name")]
    MissingCommonName,
}

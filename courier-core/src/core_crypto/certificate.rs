//! Receiver access-point certificate
//!
//! SMP records carry the receiving access point's certificate as
//! base64-encoded DER. The pipeline keeps the DER bytes opaque for the
//! crypto engine and only reads the subject common name, which doubles as
//! the receiver's ebMS3 party identifier.

use super::errors::CertificateError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fmt;
use x509_parser::prelude::*;

/// The certificate of the receiving access point, as resolved by discovery
#[derive(Clone, PartialEq, Eq)]
pub struct ReceiverCertificate {
    der: Vec<u8>,
}

impl ReceiverCertificate {
    /// Wrap raw DER bytes
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Decode the base64 transport encoding used in SMP records
    ///
    /// Whitespace (PEM-style line wrapping) is tolerated.
    pub fn from_base64(encoded: &str) -> Result<Self, CertificateError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let der = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| CertificateError::Base64(e.to_string()))?;
        Ok(Self { der })
    }

    /// The raw DER bytes
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// The base64 transport encoding of the DER bytes
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.der)
    }

    /// Extract the subject common name
    ///
    /// Access-point certificates carry the party identifier in the subject
    /// CN attribute.
    pub fn subject_common_name(&self) -> Result<String, CertificateError> {
        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        let cn = cert
            .subject()
            .iter_common_name()
            .next()
            .ok_or(CertificateError::MissingCommonName)?;
        let cn = cn
            .as_str()
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        Ok(cn.to_string())
    }
}

impl fmt::Debug for ReceiverCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // DER dumps are noise; log length and a short prefix instead
        let preview_len = self.der.len().min(8);
        f.debug_struct("ReceiverCertificate")
            .field("der_len", &self.der.len())
            .field("der_prefix", &hex::encode(&self.der[..preview_len]))
            .finish()
    }
}

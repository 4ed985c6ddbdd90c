//! Cryptographic parameter sets and certificate handling
//!
//! The send pipeline never signs or encrypts anything itself; it assembles
//! opaque signing/encryption parameter sets together with the resolved
//! receiver certificate and forwards them to the transport collaborator.
//! The only inspection done here is extracting the subject common name from
//! the receiver certificate, which becomes the receiver party identifier.

pub mod certificate;
pub mod errors;
pub mod params;

pub use certificate::ReceiverCertificate;
pub use errors::CertificateError;
pub use params::{
    CryptParams, CryptoConfig, IncomingSecurityConfig, SessionKey, SessionKeyProvider,
    SignatureAlgorithm, SigningParams,
};

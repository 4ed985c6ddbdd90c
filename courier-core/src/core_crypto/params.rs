//! Signing and encryption parameter sets
//!
//! These are assembled by the send pipeline and handed to the transport
//! collaborator, which owns the actual signing/encryption engine.

use super::certificate::ReceiverCertificate;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Signature algorithm selector forwarded to the crypto engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    RsaSha256,
    EcdsaSha256,
}

/// Parameters for signing the outgoing message
#[derive(Debug, Clone, Default)]
pub struct SigningParams {
    pub algorithm: SignatureAlgorithm,
    /// Name of the security provider the crypto engine should use
    pub security_provider: Option<String>,
}

/// Parameters for encrypting the outgoing message
#[derive(Debug, Clone)]
pub struct CryptParams {
    pub session_key_provider: SessionKeyProvider,
    /// Name of the security provider the crypto engine should use
    pub security_provider: Option<String>,
}

impl Default for CryptParams {
    fn default() -> Self {
        Self {
            session_key_provider: SessionKeyProvider::RandomAes256,
            security_provider: None,
        }
    }
}

/// Strategy producing the symmetric session key for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKeyProvider {
    RandomAes128,
    RandomAes256,
}

impl SessionKeyProvider {
    /// Generate a fresh session key
    pub fn generate(&self) -> SessionKey {
        let len = match self {
            SessionKeyProvider::RandomAes128 => 16,
            SessionKeyProvider::RandomAes256 => 32,
        };
        let mut bytes = vec![0u8; len];
        rand::rng().fill_bytes(&mut bytes);
        SessionKey { bytes }
    }
}

/// Symmetric key material; zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    bytes: Vec<u8>,
}

impl SessionKey {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log key material
        write!(f, "SessionKey({} bytes)", self.bytes.len())
    }
}

/// Everything the transport collaborator needs to sign and encrypt one
/// outgoing message
#[derive(Debug, Clone)]
pub struct CryptoConfig {
    pub signing: SigningParams,
    pub crypt: CryptParams,
    /// Certificate the message is encrypted for
    pub receiver_certificate: ReceiverCertificate,
}

impl CryptoConfig {
    /// Assemble the configuration from the two parameter sets and the
    /// resolved receiver certificate
    pub fn assemble(
        signing: SigningParams,
        crypt: CryptParams,
        receiver_certificate: ReceiverCertificate,
    ) -> Self {
        Self {
            signing,
            crypt,
            receiver_certificate,
        }
    }

    /// Security configuration applied to the incoming response signal
    pub fn incoming_security(&self) -> IncomingSecurityConfig {
        IncomingSecurityConfig {
            security_provider_sign: self.signing.security_provider.clone(),
            security_provider_crypt: self.crypt.security_provider.clone(),
        }
    }
}

/// Security providers used when verifying/decrypting the response signal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingSecurityConfig {
    pub security_provider_sign: Option<String>,
    pub security_provider_crypt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_lengths() {
        assert_eq!(SessionKeyProvider::RandomAes128.generate().len(), 16);
        assert_eq!(SessionKeyProvider::RandomAes256.generate().len(), 32);
    }

    #[test]
    fn test_session_keys_are_random() {
        let a = SessionKeyProvider::RandomAes256.generate();
        let b = SessionKeyProvider::RandomAes256.generate();
        assert_ne!(a.bytes(), b.bytes());
    }

    #[test]
    fn test_default_crypt_params_use_aes_256() {
        let params = CryptParams::default();
        assert_eq!(
            params.session_key_provider,
            SessionKeyProvider::RandomAes256
        );
    }

    #[test]
    fn test_incoming_security_mirrors_providers() {
        let signing = SigningParams {
            security_provider: Some("sign-provider".to_string()),
            ..Default::default()
        };
        let crypt = CryptParams {
            security_provider: Some("crypt-provider".to_string()),
            ..Default::default()
        };
        let cert = ReceiverCertificate::from_der(vec![1, 2, 3]);
        let config = CryptoConfig::assemble(signing, crypt, cert);

        let incoming = config.incoming_security();
        assert_eq!(
            incoming.security_provider_sign.as_deref(),
            Some("sign-provider")
        );
        assert_eq!(
            incoming.security_provider_crypt.as_deref(),
            Some("crypt-provider")
        );
    }

    #[test]
    fn test_session_key_debug_hides_material() {
        let key = SessionKeyProvider::RandomAes128.generate();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&hex::encode(key.bytes())));
    }
}

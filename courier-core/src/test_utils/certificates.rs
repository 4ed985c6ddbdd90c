//! Certificate fixtures

use crate::core_crypto::ReceiverCertificate;
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};

/// Generate a self-signed certificate whose subject CN is `common_name`,
/// returned as DER bytes
pub fn self_signed_cert_der(common_name: &str) -> Vec<u8> {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;

    let key_pair = KeyPair::generate().expect("key generation");
    let cert = params.self_signed(&key_pair).expect("self-signed certificate");
    cert.der().to_vec()
}

/// Generate a [`ReceiverCertificate`] with the given subject CN
pub fn receiver_certificate(common_name: &str) -> ReceiverCertificate {
    ReceiverCertificate::from_der(self_signed_cert_der(common_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_cert_carries_common_name() {
        let cert = receiver_certificate("AP-FIXTURE");
        assert_eq!(cert.subject_common_name().unwrap(), "AP-FIXTURE");
    }
}

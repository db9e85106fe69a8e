#![forbid(unsafe_code)]

//! The long-lived relying-party credential.

use crate::key::Key;
use crate::loader;
use crate::x509::CertificateInfo;
use vltava_core::Error;
use vltava_crypto::SigningKey;

/// Durable key material for the certificate-bound signature bindings:
/// an X.509 certificate and the matching RSA private key.
///
/// Constructed once, shared read-only for the process lifetime.
pub struct Credential {
    key: Key,
    certificate: CertificateInfo,
}

impl Credential {
    /// Build a credential from PEM-encoded certificate and private key
    /// bytes. `passphrase` decrypts an encrypted PKCS#8 key; pass `None`
    /// for an unencrypted key.
    pub fn from_pem(
        cert_pem: &[u8],
        key_pem: &[u8],
        passphrase: Option<&str>,
    ) -> Result<Self, Error> {
        let certificate = CertificateInfo::from_pem(cert_pem)?;
        let key = match passphrase {
            Some(password) => loader::load_rsa_private_encrypted_pem(key_pem, password)?,
            None => loader::load_rsa_private_pem(key_pem)?,
        };
        Ok(Self { key, certificate })
    }

    /// The signing key.
    pub fn signing_key(&self) -> Result<SigningKey, Error> {
        self.key
            .to_signing_key()
            .ok_or_else(|| Error::Key("credential has no private key".into()))
    }

    /// The verification-side view of the key.
    pub fn verification_key(&self) -> SigningKey {
        self.key.to_verification_key()
    }

    /// The credential certificate.
    pub fn certificate(&self) -> &CertificateInfo {
        &self.certificate
    }
}

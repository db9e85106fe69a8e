#![forbid(unsafe_code)]

//! Key loading from PEM (PKCS#8, encrypted PKCS#8, PKCS#1) and raw bytes.

use crate::key::{Key, KeyData};
use vltava_core::Error;

/// Load an RSA private key from PEM data.
///
/// Tries PKCS#8 (`BEGIN PRIVATE KEY`) first, then PKCS#1
/// (`BEGIN RSA PRIVATE KEY`).
pub fn load_rsa_private_pem(pem_data: &[u8]) -> Result<Key, Error> {
    use pkcs8::DecodePrivateKey;
    let pem_str = pem_utf8(pem_data)?;

    if let Ok(pk) = rsa::RsaPrivateKey::from_pkcs8_pem(pem_str) {
        return Ok(rsa_key(pk));
    }

    use pkcs1::DecodeRsaPrivateKey;
    let pk = rsa::RsaPrivateKey::from_pkcs1_pem(pem_str)
        .map_err(|e| Error::Key(format!("failed to parse RSA private key PEM: {e}")))?;
    Ok(rsa_key(pk))
}

/// Load a passphrase-protected RSA private key from encrypted PKCS#8 PEM.
pub fn load_rsa_private_encrypted_pem(pem_data: &[u8], password: &str) -> Result<Key, Error> {
    use pkcs8::DecodePrivateKey;
    let pem_str = pem_utf8(pem_data)?;
    let pk = rsa::RsaPrivateKey::from_pkcs8_encrypted_pem(pem_str, password)
        .map_err(|e| Error::Key(format!("failed to decrypt RSA private key PEM: {e}")))?;
    Ok(rsa_key(pk))
}

/// Load an RSA public key from PEM data (SPKI or PKCS#1).
pub fn load_rsa_public_pem(pem_data: &[u8]) -> Result<Key, Error> {
    use pkcs8::DecodePublicKey;
    let pem_str = pem_utf8(pem_data)?;

    if let Ok(pk) = rsa::RsaPublicKey::from_public_key_pem(pem_str) {
        return Ok(Key::new(KeyData::Rsa {
            private: None,
            public: pk,
        }));
    }

    use pkcs1::DecodeRsaPublicKey;
    let pk = rsa::RsaPublicKey::from_pkcs1_pem(pem_str)
        .map_err(|e| Error::Key(format!("failed to parse RSA public key PEM: {e}")))?;
    Ok(Key::new(KeyData::Rsa {
        private: None,
        public: pk,
    }))
}

/// Wrap raw bytes as an HMAC key.
pub fn load_hmac(data: &[u8]) -> Key {
    Key::new(KeyData::Hmac(data.to_vec()))
}

fn rsa_key(pk: rsa::RsaPrivateKey) -> Key {
    let public = pk.to_public_key();
    Key::new(KeyData::Rsa {
        private: Some(pk),
        public,
    })
}

fn pem_utf8(pem_data: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(pem_data).map_err(|e| Error::Key(format!("invalid PEM encoding: {e}")))
}

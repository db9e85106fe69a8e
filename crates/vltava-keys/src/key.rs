#![forbid(unsafe_code)]

//! Key types and data structures.

use vltava_crypto::SigningKey;

/// The underlying key data.
pub enum KeyData {
    Rsa {
        private: Option<rsa::RsaPrivateKey>,
        public: rsa::RsaPublicKey,
    },
    Hmac(Vec<u8>),
}

impl std::fmt::Debug for KeyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsa { private, .. } => {
                if private.is_some() {
                    write!(f, "RSA private+public key")
                } else {
                    write!(f, "RSA public key")
                }
            }
            Self::Hmac(k) => write!(f, "HMAC key ({} bytes)", k.len()),
        }
    }
}

/// A named key with associated data.
#[derive(Debug)]
pub struct Key {
    /// Optional name for diagnostics.
    pub name: Option<String>,
    /// The key data.
    pub data: KeyData,
}

impl Key {
    /// Create a new key.
    pub fn new(data: KeyData) -> Self {
        Self { name: None, data }
    }

    /// Set the key name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Convert to a `SigningKey` for signature creation, if the material
    /// supports signing.
    pub fn to_signing_key(&self) -> Option<SigningKey> {
        match &self.data {
            KeyData::Rsa {
                private: Some(pk), ..
            } => Some(SigningKey::Rsa(pk.clone())),
            KeyData::Rsa { private: None, .. } => None,
            KeyData::Hmac(k) => Some(SigningKey::Hmac(k.clone())),
        }
    }

    /// Convert to a `SigningKey` usable for verification.
    pub fn to_verification_key(&self) -> SigningKey {
        match &self.data {
            KeyData::Rsa { public, .. } => SigningKey::RsaPublic(public.clone()),
            KeyData::Hmac(k) => SigningKey::Hmac(k.clone()),
        }
    }
}

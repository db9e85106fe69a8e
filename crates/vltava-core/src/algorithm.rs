#![forbid(unsafe_code)]

//! Algorithm URI constants for the WS-Security signature profile.
//!
//! Each constant is the canonical URI string that appears in `Algorithm`
//! attributes of `SignedInfo` children.

// ── Canonicalization ─────────────────────────────────────────────────

pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

// ── Digest algorithms ────────────────────────────────────────────────

pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

// ── Signature algorithms ─────────────────────────────────────────────

pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const HMAC_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#hmac-sha1";
pub const HMAC_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#hmac-sha256";

/// The digest method paired with a signature method by the broker profile.
pub fn digest_for_signature(signature_uri: &str) -> Option<&'static str> {
    match signature_uri {
        RSA_SHA1 | HMAC_SHA1 => Some(SHA1),
        RSA_SHA256 | HMAC_SHA256 => Some(SHA256),
        _ => None,
    }
}

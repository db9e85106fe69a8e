#![forbid(unsafe_code)]

//! WS-Security signing and verification of SOAP envelopes.
//!
//! The signing pipeline follows the WS-Security 1.0 X.509 and SAML token
//! profiles: a `wsu:Timestamp` and a `ds:Signature` template go into the
//! `wsse:Security` header, the Body and Timestamp are digested under
//! Exclusive C14N, `SignedInfo` is signed, and only then is the key
//! identification material arranged into the binding-specific shape. The
//! signature covers Body and Timestamp, never `KeyInfo`, so the
//! rearrangement cannot invalidate it.

pub mod binding;
pub mod signature;
pub mod timestamp;
pub mod token;

pub use binding::{BinarySignature, MemorySignature, SamlTokenSignature};
pub use signature::{sign_envelope, verify_envelope, Prepared};
pub use timestamp::TimestampWindow;
pub use token::SamlToken;
